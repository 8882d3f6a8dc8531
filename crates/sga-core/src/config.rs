use std::collections::HashMap;
use std::fs;
use std::path::{
  Path,
  PathBuf
};
use std::time::Duration;

use anyhow::{
  Context,
  anyhow
};
use tracing::{
  debug,
  info,
  trace,
  warn
};

pub const DEFAULT_SERVER_URL: &str =
  "http://localhost:8000";

#[derive(Debug, Clone)]
pub struct Config {
  map: HashMap<String, String>,
  pub loaded_files: Vec<PathBuf>
}

impl Config {
  pub fn defaults() -> Self {
    let mut cfg = Config {
      map:          HashMap::new(),
      loaded_files: vec![]
    };

    cfg.map.insert(
      "server.url".to_string(),
      DEFAULT_SERVER_URL.to_string()
    );
    cfg.map.insert(
      "http.timeout".to_string(),
      "30".to_string()
    );
    cfg.map.insert(
      "confirm".to_string(),
      "on".to_string()
    );
    cfg.map.insert(
      "color".to_string(),
      "on".to_string()
    );
    cfg
  }

  #[tracing::instrument(skip(
    sgarc_override
  ))]
  pub fn load(
    sgarc_override: Option<&Path>
  ) -> anyhow::Result<Self> {
    let mut cfg = Self::defaults();

    let sgarc =
      resolve_sgarc_path(sgarc_override)?;
    if let Some(path) = sgarc {
      info!(sgarc = %path.display(), "loading sgarc");
      cfg.load_file(&path)?;
    } else {
      warn!(
        "no sgarc found; using \
         defaults"
      );
    }

    Ok(cfg)
  }

  #[tracing::instrument(skip(
    self, overrides
  ))]
  pub fn apply_overrides<I>(
    &mut self,
    overrides: I
  ) where
    I: IntoIterator<
      Item = (String, String)
    >
  {
    for (k, v) in overrides {
      let key = k
        .strip_prefix("rc.")
        .unwrap_or(&k)
        .to_string();
      debug!(key = %key, "applying override");
      self.map.insert(key, v);
    }
  }

  pub fn get(
    &self,
    key: &str
  ) -> Option<String> {
    self.map.get(key).cloned()
  }

  pub fn get_bool(
    &self,
    key: &str
  ) -> Option<bool> {
    self
      .map
      .get(key)
      .map(|v| parse_bool(v))
  }

  #[tracing::instrument(skip(self))]
  fn load_file(
    &mut self,
    path: &Path
  ) -> anyhow::Result<()> {
    let path = expand_tilde(path);
    let text =
      fs::read_to_string(&path)
        .with_context(|| {
          format!(
            "failed to read {}",
            path.display()
          )
        })?;

    self
      .loaded_files
      .push(path.clone());

    let base_dir = path
      .parent()
      .map(|p| p.to_path_buf())
      .unwrap_or_else(|| {
        PathBuf::from(".")
      });

    for (line_num, raw_line) in
      text.lines().enumerate()
    {
      let mut line = raw_line.trim();
      if line.is_empty()
        || line.starts_with('#')
      {
        continue;
      }

      if let Some((before, _)) =
        line.split_once('#')
      {
        line = before.trim();
      }

      if line.is_empty() {
        continue;
      }

      if let Some(include_rest) =
        line.strip_prefix("include ")
      {
        let include_path =
          resolve_include_path(
            &base_dir,
            include_rest.trim()
          )?;
        debug!(
            file = %path.display(),
            include = %include_path.display(),
            line = line_num + 1,
            "processing include"
        );

        if include_path.exists() {
          self
            .load_file(&include_path)?;
        } else {
          warn!(include = %include_path.display(), "include file does not exist; skipping");
        }
        continue;
      }

      let (k, v) = line
        .split_once('=')
        .ok_or_else(|| {
          anyhow!(
            "invalid config line \
             {}:{}: {}",
            path.display(),
            line_num + 1,
            raw_line
          )
        })?;

      let key = k.trim().to_string();
      let value = v.trim().to_string();
      trace!(key = %key, "loaded config key");
      self.map.insert(key, value);
    }

    Ok(())
  }
}

/// Connection settings resolved from
/// the rc keys.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerSettings {
  pub base_url:   String,
  pub csrf_token: Option<String>,
  pub session_id: Option<String>,
  pub timeout:    Duration,
  pub confirm:    bool,
  pub color:      bool
}

impl ServerSettings {
  pub fn from_config(
    cfg: &Config
  ) -> anyhow::Result<Self> {
    let base_url = cfg
      .get("server.url")
      .unwrap_or_else(|| {
        DEFAULT_SERVER_URL.to_string()
      });
    if !(base_url.starts_with("http://")
      || base_url.starts_with("https://"))
    {
      return Err(anyhow!(
        "server.url must start with \
         http:// or https://, got \
         {base_url}"
      ));
    }

    let timeout_raw = cfg
      .get("http.timeout")
      .unwrap_or_else(|| "30".to_string());
    let timeout_secs = timeout_raw
      .trim()
      .parse::<u64>()
      .with_context(|| {
        format!(
          "invalid http.timeout: \
           {timeout_raw}"
        )
      })?;

    Ok(Self {
      base_url: base_url
        .trim_end_matches('/')
        .to_string(),
      csrf_token: non_empty(
        cfg.get("csrf.token")
      ),
      session_id: non_empty(
        cfg.get("session.id")
      ),
      timeout: Duration::from_secs(
        timeout_secs
      ),
      confirm: cfg
        .get_bool("confirm")
        .unwrap_or(true),
      color: cfg
        .get_bool("color")
        .unwrap_or(true)
    })
  }
}

fn non_empty(
  value: Option<String>
) -> Option<String> {
  value.filter(|v| !v.trim().is_empty())
}

#[tracing::instrument(skip(
  override_path
))]
fn resolve_sgarc_path(
  override_path: Option<&Path>
) -> anyhow::Result<Option<PathBuf>> {
  if let Some(path) = override_path {
    return Ok(Some(path.to_path_buf()));
  }

  if let Ok(sgarc_env) =
    std::env::var("SGARC")
  {
    if sgarc_env == "/dev/null" {
      return Ok(None);
    }
    return Ok(Some(PathBuf::from(
      sgarc_env
    )));
  }

  let Some(home) = dirs::home_dir()
  else {
    warn!(
      "cannot determine home \
       directory"
    );
    return Ok(None);
  };
  let candidate = home.join(".sgarc");
  if candidate.exists() {
    return Ok(Some(candidate));
  }

  Ok(None)
}

fn resolve_include_path(
  base_dir: &Path,
  include: &str
) -> anyhow::Result<PathBuf> {
  if include.trim().is_empty() {
    return Err(anyhow!(
      "include path cannot be empty"
    ));
  }

  let raw = PathBuf::from(include);
  let expanded = expand_tilde(&raw);
  if expanded.is_absolute() {
    Ok(expanded)
  } else {
    Ok(base_dir.join(expanded))
  }
}

fn expand_tilde(
  path: &Path
) -> PathBuf {
  let text = path.to_string_lossy();
  if let Some(rest) =
    text.strip_prefix("~/")
    && let Some(home) = dirs::home_dir()
  {
    return home.join(rest);
  }
  path.to_path_buf()
}

fn parse_bool(s: &str) -> bool {
  matches!(
    s.trim()
      .to_ascii_lowercase()
      .as_str(),
    "1" | "y" | "yes" | "on" | "true"
  )
}

#[cfg(test)]
mod tests {
  use std::fs;

  use tempfile::tempdir;

  use super::*;

  #[test]
  fn rc_file_with_include_and_overrides() {
    let temp = tempdir().expect("tempdir");
    let extra = temp.path().join("extra.rc");
    fs::write(
      &extra,
      "csrf.token = abc123 # from browser\n"
    )
    .expect("write include");
    let main = temp.path().join("sgarc");
    fs::write(
      &main,
      "# SGA\nserver.url = https://sga.example/\ninclude extra.rc\nhttp.timeout=5\n"
    )
    .expect("write sgarc");

    let mut cfg =
      Config::load(Some(&main)).expect("load");
    assert_eq!(cfg.loaded_files.len(), 2);
    cfg.apply_overrides([(
      "rc.confirm".to_string(),
      "off".to_string()
    )]);

    let settings =
      ServerSettings::from_config(&cfg)
        .expect("settings");
    assert_eq!(
      settings.base_url,
      "https://sga.example"
    );
    assert_eq!(
      settings.csrf_token.as_deref(),
      Some("abc123")
    );
    assert_eq!(settings.session_id, None);
    assert_eq!(
      settings.timeout,
      Duration::from_secs(5)
    );
    assert!(!settings.confirm);
  }

  #[test]
  fn malformed_line_reports_its_location() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("sgarc");
    fs::write(&path, "server.url\n")
      .expect("write");
    let err = Config::load(Some(&path))
      .expect_err("invalid line");
    assert!(
      format!("{err:#}").contains(":1:")
    );
  }

  #[test]
  fn non_http_server_url_is_rejected() {
    let mut cfg = Config::defaults();
    cfg.apply_overrides([(
      "server.url".to_string(),
      "ftp://sga".to_string()
    )]);
    assert!(
      ServerSettings::from_config(&cfg)
        .is_err()
    );
  }
}
