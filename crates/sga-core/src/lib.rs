pub mod cli;
pub mod commands;
pub mod config;
pub mod http;
pub mod prompt;
pub mod render;

use std::ffi::OsString;

use anyhow::Context;
use clap::Parser;
use tracing::{
  debug,
  info
};

use crate::commands::Session;
use crate::config::ServerSettings;
use crate::http::HttpTransport;
use crate::prompt::{
  AutoConfirm,
  TerminalPrompt
};
use crate::render::Renderer;

#[tracing::instrument(skip_all)]
pub fn run(
  raw_args: Vec<OsString>
) -> anyhow::Result<()> {
  let pre =
    cli::preprocess_args(&raw_args)?;
  let cli = cli::GlobalCli::parse_from(
    pre.cleaned_args
  );

  cli::init_tracing(
    cli.verbose,
    cli.quiet
  )?;

  info!(
    verbose = cli.verbose,
    quiet = cli.quiet,
    "starting sga CLI"
  );
  debug!(?pre.rc_overrides, "preprocessed rc overrides");

  let mut cfg = config::Config::load(
    cli.sgarc.as_deref()
  )?;
  cfg.apply_overrides(
    pre.rc_overrides.into_iter().chain(
      cli
        .rc_overrides
        .into_iter()
        .map(|kv| (kv.key, kv.value))
    )
  );

  let settings =
    ServerSettings::from_config(&cfg)
      .context(
        "invalid server settings"
      )?;
  let renderer = Renderer::new(&settings);
  let auto_confirm =
    cli.yes || !settings.confirm;
  let transport =
    HttpTransport::new(settings)?;

  let runtime =
    tokio::runtime::Builder::new_current_thread()
      .enable_all()
      .build()
      .context(
        "failed to start async runtime"
      )?;

  let stdout = std::io::stdout();
  let mut out = stdout.lock();
  runtime.block_on(async {
    if auto_confirm {
      Session::new(
        &transport,
        &AutoConfirm,
        &renderer,
        &mut out
      )
      .execute(cli.command)
      .await
    } else {
      Session::new(
        &transport,
        &TerminalPrompt,
        &renderer,
        &mut out
      )
      .execute(cli.command)
      .await
    }
  })?;

  info!("done");
  Ok(())
}
