use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Args;
use stockpage_lib::{pipeline, AppConfig, FtpUploader};

use crate::output::{print_summary, OutputFormat};

#[derive(Args)]
pub struct PublishArgs {
    /// Write the page here instead of the configured output path
    #[arg(long)]
    pub out_file: Option<PathBuf>,

    /// Write the page but skip the FTP upload
    #[arg(long)]
    pub no_upload: bool,
}

pub async fn run(args: &PublishArgs, config: &AppConfig, format: &OutputFormat) -> Result<()> {
    let mut config = config.clone();
    if let Some(out_file) = &args.out_file {
        config.output_path = out_file.clone();
    }

    let client = config.client();
    let summary = if args.no_upload {
        pipeline::run_without_publish(&config, &client).await?
    } else {
        // Credentials are checked before anything is fetched or written.
        let target = config.publish_target()?;
        let uploader = Arc::new(FtpUploader::from_config(target)?);
        pipeline::run(&config, &client, uploader).await?
    };
    print_summary(&summary, format)?;

    Ok(())
}
