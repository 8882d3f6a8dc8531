use std::io::{IsTerminal, Write};

use sga_shared::client::ClientSummary;
use sga_shared::{
    DispatchOutcome, ProcessSnapshot, ProcessStatus, RecordPatch, ShippingQuote,
    ZipcodeAddress,
};
use unicode_width::UnicodeWidthStr;

use crate::config::ServerSettings;

#[derive(Debug, Clone)]
pub struct Renderer {
    color: bool,
}

impl Renderer {
    pub fn new(settings: &ServerSettings) -> Self {
        Self {
            color: settings.color && std::io::stdout().is_terminal(),
        }
    }

    pub fn plain() -> Self {
        Self { color: false }
    }

    pub fn print_outcome<W: Write>(
        &self,
        out: &mut W,
        outcome: &DispatchOutcome,
    ) -> anyhow::Result<()> {
        match outcome {
            DispatchOutcome::Applied {
                record,
                patch,
                message,
            } => {
                let record = record
                    .map(|id| id.to_string())
                    .unwrap_or_else(|| "-".to_string());
                writeln!(
                    out,
                    "{} {record}: {}",
                    self.paint("ok", "32"),
                    describe_patch(patch)
                )?;
                if let Some(message) = message {
                    writeln!(out, "{message}")?;
                }
            }
            DispatchOutcome::Info(message) => {
                writeln!(out, "{} {message}", self.paint("info", "36"))?;
            }
            other => {
                if let Some(text) = other.alert_text() {
                    writeln!(out, "{} {text}", self.paint("erro", "31"))?;
                }
            }
        }
        Ok(())
    }

    pub fn print_statuses<W: Write>(&self, out: &mut W) -> anyhow::Result<()> {
        let rows = ProcessStatus::SELECTABLE
            .iter()
            .map(|status| vec![self.paint(status.as_str(), "33"), status.label().to_string()])
            .collect();
        write_table(out, vec!["Valor".to_string(), "Status".to_string()], rows)
    }

    pub fn print_address<W: Write>(
        &self,
        out: &mut W,
        address: &ZipcodeAddress,
    ) -> anyhow::Result<()> {
        writeln!(out, "logradouro  {}", address.street)?;
        writeln!(out, "bairro      {}", address.district)?;
        writeln!(out, "cidade      {}", address.city)?;
        writeln!(out, "estado      {}", address.state)?;
        if !address.cep.is_empty() {
            writeln!(out, "cep         {}", address.cep)?;
        }
        Ok(())
    }

    pub fn print_quotes<W: Write>(
        &self,
        out: &mut W,
        quotes: &[ShippingQuote],
    ) -> anyhow::Result<()> {
        let rows = quotes
            .iter()
            .map(|quote| {
                vec![
                    quote.service.clone(),
                    format!("{} dia(s)", quote.days),
                    format!("R$ {:.2}", quote.price).replace('.', ","),
                    quote.expected_delivery.clone(),
                ]
            })
            .collect();
        write_table(
            out,
            vec![
                "Serviço".to_string(),
                "Prazo".to_string(),
                "Preço".to_string(),
                "Entrega prevista".to_string(),
            ],
            rows,
        )
    }

    pub fn print_clients<W: Write>(
        &self,
        out: &mut W,
        clients: &[ClientSummary],
    ) -> anyhow::Result<()> {
        if clients.is_empty() {
            writeln!(out, "Nenhum cliente encontrado.")?;
            return Ok(());
        }
        let rows = clients
            .iter()
            .map(|client| vec![self.paint(&client.id.to_string(), "33"), client.display()])
            .collect();
        write_table(out, vec!["ID".to_string(), "Cliente".to_string()], rows)
    }

    fn paint(&self, text: &str, code: &str) -> String {
        if !self.color {
            return text.to_string();
        }
        format!("\x1b[{code}m{text}\x1b[0m")
    }
}

fn describe_patch(patch: &RecordPatch) -> String {
    match patch {
        RecordPatch::Status(status) => format!("status {}", status.label()),
        RecordPatch::Tracking(code) => format!("rastreio {code}"),
        RecordPatch::CommentAdded { forwarded: true } => {
            "comentário adicionado e encaminhado à gestão".to_string()
        }
        RecordPatch::CommentAdded { forwarded: false } => "comentário adicionado".to_string(),
        RecordPatch::Snapshot(snapshot) => snapshot_parts(snapshot).join(", "),
        RecordPatch::Merged { effect, snapshot } => {
            let mut parts = snapshot_parts(snapshot);
            let covered = match effect.as_ref() {
                RecordPatch::Status(_) => snapshot.status.is_some(),
                RecordPatch::Tracking(_) => snapshot.tracking_code.is_some(),
                _ => false,
            };
            if !covered {
                parts.insert(0, describe_patch(effect));
            }
            parts.join(", ")
        }
        RecordPatch::Client(form) => format!("cliente {} atualizado", form.nome),
        RecordPatch::Timeline => "rastreamento atualizado".to_string(),
    }
}

fn snapshot_parts(snapshot: &ProcessSnapshot) -> Vec<String> {
    let mut parts = Vec::new();
    if let Some(status) = snapshot.status {
        parts.push(format!("status {}", status.label()));
    }
    if let Some(code) = snapshot.tracking_code.as_deref() {
        parts.push(format!("rastreio {code}"));
    }
    if let Some(assignee) = snapshot.assignee.as_deref() {
        parts.push(format!("responsável {assignee}"));
    }
    parts
}

fn write_table<W: Write>(
    mut writer: W,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
) -> anyhow::Result<()> {
    let column_count = headers.len();
    let mut widths = vec![0usize; column_count];

    for (idx, header) in headers.iter().enumerate() {
        widths[idx] = widths[idx].max(UnicodeWidthStr::width(header.as_str()));
    }

    for row in &rows {
        for (idx, cell) in row.iter().enumerate() {
            widths[idx] = widths[idx].max(UnicodeWidthStr::width(strip_ansi(cell).as_str()));
        }
    }

    for (header, width) in headers.iter().zip(&widths) {
        let padding = width.saturating_sub(UnicodeWidthStr::width(header.as_str()));
        write!(writer, "{header}{} ", " ".repeat(padding))?;
    }
    writeln!(writer)?;

    for width in &widths {
        write!(writer, "{:-<width$} ", "", width = *width)?;
    }
    writeln!(writer)?;

    for row in rows {
        for (cell, width) in row.iter().zip(&widths) {
            let visible_width = UnicodeWidthStr::width(strip_ansi(cell).as_str());
            let padding = width.saturating_sub(visible_width);
            write!(writer, "{}{} ", cell, " ".repeat(padding))?;
        }
        writeln!(writer)?;
    }

    Ok(())
}

fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut escaped = false;

    for ch in s.chars() {
        if escaped {
            if ch == 'm' {
                escaped = false;
            }
            continue;
        }

        if ch == '\x1b' {
            escaped = true;
            continue;
        }

        out.push(ch);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(f: impl FnOnce(&Renderer, &mut Vec<u8>) -> anyhow::Result<()>) -> String {
        let mut buf = Vec::new();
        f(&Renderer::plain(), &mut buf).expect("render");
        String::from_utf8(buf).expect("utf8")
    }

    #[test]
    fn table_pads_accented_headers_by_display_width() {
        let text = render(|r, out| {
            r.print_quotes(
                out,
                &[ShippingQuote {
                    service: "PAC".to_string(),
                    days: 7,
                    price: 23.5,
                    expected_delivery: "2026-10-27".to_string(),
                }],
            )
        });
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Serviço Prazo    Preço    Entrega prevista ");
        assert_eq!(lines[2], "PAC     7 dia(s) R$ 23,50 2026-10-27       ");
    }

    #[test]
    fn applied_status_names_the_record() {
        let text = render(|r, out| {
            r.print_outcome(
                out,
                &DispatchOutcome::Applied {
                    record: Some(42),
                    patch: RecordPatch::Status(ProcessStatus::Pending),
                    message: None,
                },
            )
        });
        assert_eq!(text, "ok 42: status Pendente\n");
    }

    #[test]
    fn merged_comment_reports_both_the_comment_and_the_echo() {
        let text = render(|r, out| {
            r.print_outcome(
                out,
                &DispatchOutcome::Applied {
                    record: Some(7),
                    patch: RecordPatch::Merged {
                        effect: Box::new(RecordPatch::CommentAdded { forwarded: false }),
                        snapshot: ProcessSnapshot {
                            status: Some(ProcessStatus::Pending),
                            ..ProcessSnapshot::default()
                        },
                    },
                    message: None,
                },
            )
        });
        assert_eq!(text, "ok 7: comentário adicionado, status Pendente
");
    }

    #[test]
    fn strip_ansi_removes_color_codes() {
        assert_eq!(strip_ansi("\x1b[33m12\x1b[0m"), "12");
    }
}
