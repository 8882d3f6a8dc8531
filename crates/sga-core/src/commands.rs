use std::io::Write;

use anyhow::{Context, anyhow, bail};
use sga_shared::client::{ClientForm, ClientSummary, search_request};
use sga_shared::confirm::{Prompt, run_confirmed};
use sga_shared::dispatch::{CONNECTION_ERROR_MESSAGE, Mutation};
use sga_shared::shipping::{decode_quotes, quote_request, tracking_refresh};
use sga_shared::zipcode::{ZipcodeState, lookup_zipcode};
use sga_shared::{
    ConfirmAction, DispatchOutcome, Dispatcher, ModalKind, ModalState, RecordPatch, Transport,
    TriggerAttrs,
};
use tracing::{debug, info, instrument};

use crate::cli::{Command, KeyVal};
use crate::render::Renderer;

/// Everything a command needs to talk to the server and report back.
pub struct Session<'a, T, P, W> {
    pub transport: &'a T,
    pub prompt: &'a P,
    pub renderer: &'a Renderer,
    pub out: &'a mut W,
    pub dispatcher: Dispatcher,
}

impl<'a, T, P, W> Session<'a, T, P, W>
where
    T: Transport,
    P: Prompt,
    W: Write,
{
    pub fn new(transport: &'a T, prompt: &'a P, renderer: &'a Renderer, out: &'a mut W) -> Self {
        Self {
            transport,
            prompt,
            renderer,
            out,
            dispatcher: Dispatcher::new(),
        }
    }

    #[instrument(skip(self))]
    pub async fn execute(&mut self, command: Command) -> anyhow::Result<()> {
        match command {
            Command::Status { pk, status } => {
                let mut modal = bind_modal(ModalKind::Status, pk);
                modal.status = status;
                self.save_modal(modal).await
            }
            Command::Tracking { pk, code } => {
                let mut modal = bind_modal(ModalKind::Tracking, pk);
                modal.tracking_code = code;
                self.save_modal(modal).await
            }
            Command::Comment { pk, text, forward } => {
                let mut modal = bind_modal(ModalKind::Comment, pk);
                modal.comment = text;
                modal.forward_to_mgmt = forward;
                self.save_modal(modal).await
            }
            Command::Assign { pk } => self.inline(ConfirmAction::Assign, pk).await,
            Command::Cancel { pk } => self.inline(ConfirmAction::Cancel, pk).await,
            Command::Reactivate { pk } => self.inline(ConfirmAction::Reactivate, pk).await,
            Command::Cep { cep } => self.zipcode(&cep).await,
            Command::Quote { pk } => self.quote(pk).await,
            Command::RefreshTracking { pk } => self.submit(tracking_refresh(pk)).await,
            Command::Clients { term } => self.clients(&term).await,
            Command::EditClient { id, fields } => {
                let (form, zipcode) = self.client_form(id, &fields).await?;
                let mutation = form.edit_mutation(&zipcode)?;
                self.submit(mutation).await
            }
            Command::NewClient { fields } => self.new_client(&fields).await,
            Command::Statuses => self.renderer.print_statuses(self.out),
        }
    }

    async fn save_modal(&mut self, modal: ModalState) -> anyhow::Result<()> {
        let mutation = modal
            .save()
            .with_context(|| format!("invalid {:?} form", modal.kind))?;
        self.submit(mutation).await
    }

    async fn submit(&mut self, mutation: Mutation) -> anyhow::Result<()> {
        let outcome = self.dispatcher.dispatch(self.transport, mutation).await;
        self.finish(outcome)
    }

    async fn inline(&mut self, action: ConfirmAction, pk: u64) -> anyhow::Result<()> {
        match run_confirmed(self.prompt, &self.dispatcher, self.transport, action, pk).await {
            Some(outcome) => self.finish(outcome),
            None => {
                writeln!(self.out, "operação cancelada; nada foi enviado")?;
                Ok(())
            }
        }
    }

    /// Prints success and info outcomes; failures become the command's error.
    fn finish(&mut self, outcome: DispatchOutcome) -> anyhow::Result<()> {
        match &outcome {
            DispatchOutcome::Applied { .. } | DispatchOutcome::Info(_) => {
                self.renderer.print_outcome(self.out, &outcome)
            }
            DispatchOutcome::Rejected(message) => Err(anyhow!("{message}")),
            DispatchOutcome::ConnectionFailed => Err(anyhow!(CONNECTION_ERROR_MESSAGE)),
            DispatchOutcome::Busy => bail!("another request is still in flight"),
        }
    }

    async fn zipcode(&mut self, cep: &str) -> anyhow::Result<()> {
        match lookup_zipcode(self.transport, cep).await {
            Some(ZipcodeState::Valid(address)) => self.renderer.print_address(self.out, &address),
            Some(other) => bail!(other.status_text().unwrap_or("CEP inválido.")),
            None => bail!("informe um CEP"),
        }
    }

    async fn quote(&mut self, pk: u64) -> anyhow::Result<()> {
        let envelope = self
            .transport
            .send(&quote_request(pk))
            .await
            .context(CONNECTION_ERROR_MESSAGE)?;
        let quotes = decode_quotes(&envelope)?;
        info!(pk, count = quotes.len(), "received shipping quotes");
        self.renderer.print_quotes(self.out, &quotes)
    }

    async fn clients(&mut self, term: &str) -> anyhow::Result<()> {
        let request = search_request(term)?;
        let envelope = self
            .transport
            .send(&request)
            .await
            .context(CONNECTION_ERROR_MESSAGE)?;
        let clients: Vec<ClientSummary> = envelope.field_as("results").unwrap_or_default();
        self.renderer.print_clients(self.out, &clients)
    }

    async fn new_client(&mut self, fields: &[KeyVal]) -> anyhow::Result<()> {
        let (form, zipcode) = self.client_form(0, fields).await?;
        let mutation = form.create_mutation(&zipcode)?;
        match self.dispatcher.dispatch(self.transport, mutation).await {
            DispatchOutcome::Applied {
                patch: RecordPatch::Client(saved),
                ..
            } => {
                writeln!(self.out, "ok {}: cliente {} cadastrado", saved.id, saved.nome)?;
                Ok(())
            }
            other => self.finish(other),
        }
    }

    /// Builds a client form from `--field` pairs and fills blank address
    /// fields from the CEP lookup.
    async fn client_form(
        &mut self,
        id: u64,
        fields: &[KeyVal],
    ) -> anyhow::Result<(ClientForm, ZipcodeState)> {
        let mut form = ClientForm {
            id,
            ..ClientForm::default()
        };
        for field in fields {
            form.set_field(&field.key, &field.value)?;
        }

        let zipcode = lookup_zipcode(self.transport, &form.cep)
            .await
            .unwrap_or_default();
        if let ZipcodeState::Valid(address) = &zipcode {
            debug!("filling blank address fields from CEP lookup");
            for (slot, value) in [
                (&mut form.logradouro, &address.street),
                (&mut form.bairro, &address.district),
                (&mut form.cidade, &address.city),
                (&mut form.estado, &address.state),
            ] {
                if slot.trim().is_empty() {
                    *slot = value.clone();
                }
            }
        }

        Ok((form, zipcode))
    }
}

/// The CLI's stand-in for a row icon: only the pk is known.
fn bind_modal(kind: ModalKind, pk: u64) -> ModalState {
    ModalState::bind(
        kind,
        &TriggerAttrs {
            pk: pk.to_string(),
            ..TriggerAttrs::default()
        },
    )
}
