use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use object_store_client::{
    AppDependencies, BucketName, BucketStore, CannedAcl, ObjectKey, ObjectStore, PutObjectOptions,
    ServerSideEncryption, StorageClass, TransferService, create_app_from_env, walkthrough,
};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "object-store-cli")]
#[command(about = "CLI for S3-compatible object storage", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Manage buckets
    Bucket {
        #[command(subcommand)]
        command: BucketCommands,
    },

    /// Upload a file
    Put {
        /// Bucket name
        bucket: String,
        /// File path to upload
        file: PathBuf,
        /// Object key (defaults to the file name)
        #[arg(short, long)]
        key: Option<String>,
        /// Canned ACL to apply
        #[arg(long)]
        acl: Option<CannedAcl>,
        /// Server-side encryption algorithm
        #[arg(long)]
        sse: Option<ServerSideEncryption>,
        /// Storage class
        #[arg(long)]
        storage_class: Option<StorageClass>,
        /// Content type
        #[arg(long)]
        content_type: Option<String>,
    },

    /// Download an object
    Get {
        /// Bucket name
        bucket: String,
        /// Object key
        key: String,
        /// Output file path (defaults to the key's file name)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Copy an object between buckets server-side
    Copy {
        /// Source bucket
        source_bucket: String,
        /// Object key
        key: String,
        /// Destination bucket
        dest_bucket: String,
        /// Destination key (defaults to the source key)
        #[arg(long)]
        dest_key: Option<String>,
    },

    /// Delete an object
    Delete {
        /// Bucket name
        bucket: String,
        /// Object key
        key: String,
    },

    /// List objects in a bucket
    List {
        /// Bucket name
        bucket: String,
    },

    /// Manage object versions
    Version {
        #[command(subcommand)]
        command: VersionCommands,
    },

    /// Manage object ACLs
    Acl {
        #[command(subcommand)]
        command: AclCommands,
    },
}

#[derive(Subcommand, Debug)]
enum BucketCommands {
    /// Create a bucket; with --prefix the name gets a random unique suffix
    Create {
        /// Exact bucket name
        name: Option<String>,
        /// Generate the name from this prefix instead
        #[arg(long, conflicts_with = "name")]
        prefix: Option<String>,
    },

    /// List all buckets
    List,

    /// Delete an empty bucket
    Delete {
        /// Bucket name
        name: String,
    },

    /// Delete every object version, then the bucket itself
    Purge {
        /// Bucket name
        name: String,
    },
}

#[derive(Subcommand, Debug)]
enum VersionCommands {
    /// Enable versioning on a bucket
    Enable {
        /// Bucket name
        bucket: String,
    },

    /// Show a bucket's versioning status
    Status {
        /// Bucket name
        bucket: String,
    },

    /// List all object versions in a bucket
    List {
        /// Bucket name
        bucket: String,
    },
}

#[derive(Subcommand, Debug)]
enum AclCommands {
    /// Show an object's access-control grants
    Get {
        /// Bucket name
        bucket: String,
        /// Object key
        key: String,
    },

    /// Replace an object's ACL with a canned one
    Set {
        /// Bucket name
        bucket: String,
        /// Object key
        key: String,
        /// Canned ACL
        acl: CannedAcl,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let deps = create_app_from_env()
        .await
        .context("Failed to build application")?;

    run_command(&deps, cli.command).await
}

async fn run_command(deps: &AppDependencies, command: Commands) -> Result<()> {
    match command {
        Commands::Bucket { command } => run_bucket_command(deps, command).await,

        Commands::Put {
            bucket,
            file,
            key,
            acl,
            sse,
            storage_class,
            content_type,
        } => {
            let bucket = BucketName::new(bucket)?;
            let key = match key {
                Some(key) => ObjectKey::new(key)?,
                None => ObjectKey::new(
                    file.file_name()
                        .and_then(|name| name.to_str())
                        .context("file path has no file name")?
                        .to_string(),
                )?,
            };

            let options = PutObjectOptions {
                acl,
                server_side_encryption: sse,
                storage_class,
                content_type,
            };

            let metadata = deps
                .transfer_service
                .upload_file(&file, &bucket, &key, &options)
                .await?;
            println!("uploaded {}/{} ({} bytes)", bucket, key, metadata.content_length);
            if let Some(version) = metadata.version_id {
                println!("version id: {}", version);
            }
            Ok(())
        }

        Commands::Get {
            bucket,
            key,
            output,
        } => {
            let bucket = BucketName::new(bucket)?;
            let key = ObjectKey::new(key)?;
            let dest = output.unwrap_or_else(|| PathBuf::from(key.file_name()));

            let size = deps.transfer_service.download_file(&bucket, &key, &dest).await?;
            println!("downloaded {}/{} to {} ({} bytes)", bucket, key, dest.display(), size);
            Ok(())
        }

        Commands::Copy {
            source_bucket,
            key,
            dest_bucket,
            dest_key,
        } => {
            let source_bucket = BucketName::new(source_bucket)?;
            let dest_bucket = BucketName::new(dest_bucket)?;
            let key = ObjectKey::new(key)?;
            let dest_key = match dest_key {
                Some(dest_key) => ObjectKey::new(dest_key)?,
                None => key.clone(),
            };

            deps.object_store
                .copy_object(&source_bucket, &key, &dest_bucket, &dest_key)
                .await?;
            println!("copied {}/{} to {}/{}", source_bucket, key, dest_bucket, dest_key);
            Ok(())
        }

        Commands::Delete { bucket, key } => {
            let bucket = BucketName::new(bucket)?;
            let key = ObjectKey::new(key)?;

            deps.object_store.delete_object(&bucket, &key).await?;
            println!("deleted {}/{}", bucket, key);
            Ok(())
        }

        Commands::List { bucket } => {
            let bucket = BucketName::new(bucket)?;
            let objects = deps.object_store.list_objects(&bucket).await?;
            for object in &objects {
                println!(
                    "{}\t{} bytes\t{}",
                    object.key,
                    object.size,
                    object
                        .storage_class
                        .map(|class| class.to_string())
                        .unwrap_or_else(|| "-".to_string())
                );
            }
            println!("{} object(s)", objects.len());
            Ok(())
        }

        Commands::Version { command } => run_version_command(deps, command).await,

        Commands::Acl { command } => run_acl_command(deps, command).await,
    }
}

async fn run_bucket_command(deps: &AppDependencies, command: BucketCommands) -> Result<()> {
    match command {
        BucketCommands::Create { name, prefix } => {
            let bucket = match (name, prefix) {
                (Some(name), _) => BucketName::new(name)?,
                (None, Some(prefix)) => BucketName::generate(&prefix)?,
                (None, None) => anyhow::bail!("either a bucket name or --prefix is required"),
            };

            deps.bucket_store.create_bucket(&bucket).await?;
            println!("created bucket {}", bucket);
            Ok(())
        }

        BucketCommands::List => {
            let buckets = deps.bucket_store.list_buckets().await?;
            for bucket in &buckets {
                println!(
                    "{}\t{}",
                    bucket.name,
                    bucket
                        .creation_date
                        .map(|date| date.to_rfc3339())
                        .unwrap_or_else(|| "-".to_string())
                );
            }
            println!("{} bucket(s)", buckets.len());
            Ok(())
        }

        BucketCommands::Delete { name } => {
            let bucket = BucketName::new(name)?;
            deps.bucket_store.delete_bucket(&bucket).await?;
            println!("deleted bucket {}", bucket);
            Ok(())
        }

        BucketCommands::Purge { name } => {
            let bucket = BucketName::new(name)?;
            walkthrough::purge_bucket(deps, &bucket).await?;
            println!("purged bucket {}", bucket);
            Ok(())
        }
    }
}

async fn run_version_command(deps: &AppDependencies, command: VersionCommands) -> Result<()> {
    match command {
        VersionCommands::Enable { bucket } => {
            let bucket = BucketName::new(bucket)?;
            deps.bucket_store.enable_versioning(&bucket).await?;
            let status = deps.bucket_store.versioning_status(&bucket).await?;
            println!("versioning on {}: {}", bucket, status);
            Ok(())
        }

        VersionCommands::Status { bucket } => {
            let bucket = BucketName::new(bucket)?;
            let status = deps.bucket_store.versioning_status(&bucket).await?;
            println!("versioning on {}: {}", bucket, status);
            Ok(())
        }

        VersionCommands::List { bucket } => {
            let bucket = BucketName::new(bucket)?;
            let versions = deps.object_store.list_object_versions(&bucket).await?;
            for version in &versions {
                println!(
                    "{}\t{}\t{}{}",
                    version.key,
                    version.version_id,
                    if version.is_latest { "latest" } else { "-" },
                    if version.is_delete_marker {
                        " (delete marker)"
                    } else {
                        ""
                    }
                );
            }
            println!("{} version(s)", versions.len());
            Ok(())
        }
    }
}

async fn run_acl_command(deps: &AppDependencies, command: AclCommands) -> Result<()> {
    match command {
        AclCommands::Get { bucket, key } => {
            let bucket = BucketName::new(bucket)?;
            let key = ObjectKey::new(key)?;
            let acl = deps.object_store.get_object_acl(&bucket, &key).await?;

            for grant in &acl.grants {
                match &grant.grantee {
                    object_store_client::Grantee::CanonicalUser { id, display_name } => {
                        println!(
                            "user {}{}\t{}",
                            id,
                            display_name
                                .as_deref()
                                .map(|name| format!(" ({})", name))
                                .unwrap_or_default(),
                            grant.permission
                        );
                    }
                    object_store_client::Grantee::Group { uri } => {
                        println!("group {}\t{}", uri, grant.permission);
                    }
                }
            }
            println!(
                "{} grant(s){}",
                acl.grants.len(),
                if acl.is_public_read() {
                    ", public-read"
                } else {
                    ""
                }
            );
            Ok(())
        }

        AclCommands::Set { bucket, key, acl } => {
            let bucket = BucketName::new(bucket)?;
            let key = ObjectKey::new(key)?;
            deps.object_store.put_object_acl(&bucket, &key, acl).await?;
            println!("set ACL on {}/{} to {}", bucket, key, acl);
            Ok(())
        }
    }
}
