mod transfer_service_impl;

pub use transfer_service_impl::TransferServiceImpl;
