use anyhow::{Context, Result};
use clap::Parser;
use object_store_client::{create_app_from_env, walkthrough};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "object-store-walkthrough")]
#[command(about = "Guided tour of the object storage operation surface", long_about = None)]
struct Cli {
    /// Prefix for the first generated bucket name
    #[arg(long, env = "WALKTHROUGH_FIRST_PREFIX", default_value = "first-demo-bucket-")]
    first_prefix: String,

    /// Prefix for the second generated bucket name
    #[arg(long, env = "WALKTHROUGH_SECOND_PREFIX", default_value = "second-demo-bucket-")]
    second_prefix: String,

    /// Directory for local fixture files (defaults to the system temp dir)
    #[arg(long, env = "WALKTHROUGH_WORK_DIR")]
    work_dir: Option<PathBuf>,

    /// Hex characters of random token kept in fixture file names
    #[arg(long, env = "WALKTHROUGH_FILE_TOKEN_LEN", default_value = "6")]
    file_token_len: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let deps = create_app_from_env()
        .await
        .context("Failed to build application")?;

    let options = walkthrough::WalkthroughOptions {
        first_bucket_prefix: cli.first_prefix,
        second_bucket_prefix: cli.second_prefix,
        work_dir: cli.work_dir.unwrap_or_else(std::env::temp_dir),
        file_token_len: cli.file_token_len,
    };

    info!("starting walkthrough");
    let report = walkthrough::run(&deps, &options)
        .await
        .context("Walkthrough failed")?;

    println!("Walkthrough complete");
    println!("  first bucket:        {}", report.first_bucket);
    println!("  second bucket:       {}", report.second_bucket);
    println!("  round trip ok:       {}", report.round_trip_ok);
    println!("  ACL public then:     {}", report.acl_was_public);
    println!("  ACL private after:   {}", report.acl_now_private);
    println!(
        "  encryption observed: {}",
        report
            .encryption_observed
            .map(|sse| sse.to_string())
            .unwrap_or_else(|| "-".to_string())
    );
    println!(
        "  storage class:       {}",
        report
            .storage_class_observed
            .map(|class| class.to_string())
            .unwrap_or_else(|| "-".to_string())
    );
    println!("  versioning status:   {}", report.versioning_status);
    println!("  versions of key:     {}", report.distinct_version_ids);
    println!(
        "  latest version id:   {}",
        report
            .latest_version_id
            .map(|version| version.to_string())
            .unwrap_or_else(|| "-".to_string())
    );
    println!("  buckets seen:        {}", report.buckets_seen);
    println!("  objects seen:        {}", report.objects_seen);
    println!("  versions seen:       {}", report.versions_seen);

    Ok(())
}
