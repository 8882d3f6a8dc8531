use std::cell::RefCell;
use std::fs;

use serde_json::json;
use sga_core::cli::Command;
use sga_core::commands::Session;
use sga_core::config::{Config, ServerSettings};
use sga_core::prompt::AutoConfirm;
use sga_core::render::Renderer;
use sga_shared::{ApiEnvelope, ApiRequest, Endpoint, Transport};
use tempfile::tempdir;

struct EchoServer {
    sent: RefCell<Vec<ApiRequest>>,
}

impl Transport for EchoServer {
    async fn send(&self, request: &ApiRequest) -> anyhow::Result<ApiEnvelope> {
        self.sent.borrow_mut().push(request.clone());
        Ok(ApiEnvelope::success(Some(json!({
            "status": "atribuido",
            "responsavel": "ana"
        }))))
    }
}

#[test]
fn sgarc_overrides_resolve_into_server_settings() {
    let temp = tempdir().expect("tempdir");
    let rc = temp.path().join("sgarc");
    fs::write(
        &rc,
        "server.url = https://sga.example/\ncsrf.token = abc\nhttp.timeout = 5\n",
    )
    .expect("write sgarc");

    let mut cfg = Config::load(Some(&rc)).expect("load sgarc");
    cfg.apply_overrides([("rc.confirm".to_string(), "off".to_string())]);
    let settings = ServerSettings::from_config(&cfg).expect("settings");

    assert_eq!(settings.base_url, "https://sga.example");
    assert_eq!(settings.csrf_token.as_deref(), Some("abc"));
    assert_eq!(settings.timeout.as_secs(), 5);
    assert!(!settings.confirm);
}

#[tokio::test]
async fn assign_uses_the_server_snapshot() {
    let server = EchoServer {
        sent: RefCell::new(Vec::new()),
    };
    let renderer = Renderer::plain();
    let mut out = Vec::new();

    Session::new(&server, &AutoConfirm, &renderer, &mut out)
        .execute(Command::Assign { pk: 12 })
        .await
        .expect("assign");

    let text = String::from_utf8(out).expect("utf8");
    assert_eq!(text, "ok 12: status Atribuído, responsável ana\n");
    let sent = server.sent.borrow();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].endpoint, Endpoint::ProcessAssign(12));
    assert_eq!(sent[0].body, Some(json!({})));
}
