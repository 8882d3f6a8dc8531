use serde::{
  Deserialize,
  Serialize
};
use serde_json::json;

use crate::dispatch::{
  Mutation,
  RecordPatch
};
use crate::endpoint::{
  ApiRequest,
  Endpoint
};
use crate::error::ValidationError;
use crate::zipcode::{
  ZIPCODE_LEN,
  ZipcodeState,
  normalize_zipcode
};

pub const SEARCH_MIN_CHARS: usize = 2;

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
pub struct ClientSummary {
  pub id:     u64,
  #[serde(default)]
  pub nome:   String,
  #[serde(default)]
  pub cidade: String,
  #[serde(default)]
  pub estado: String
}

impl ClientSummary {
  pub fn display(&self) -> String {
    format!(
      "{} ({}/{})",
      self.nome, self.cidade, self.estado
    )
  }
}

impl From<&ClientForm> for ClientSummary {
  fn from(form: &ClientForm) -> Self {
    Self {
      id:     form.id,
      nome:   form.nome.clone(),
      cidade: form.cidade.clone(),
      estado: form.estado.clone()
    }
  }
}

/// Typeahead query; too-short terms
/// produce no request.
pub fn search_request(
  term: &str
) -> Result<ApiRequest, ValidationError> {
  let term = term.trim();
  if term.chars().count() < SEARCH_MIN_CHARS {
    return Err(
      ValidationError::SearchTermTooShort
    );
  }
  Ok(ApiRequest::get(
    Endpoint::ClientSearch,
    [("term", term)]
  ))
}

/// Field names match the server form,
/// which is also the JSON body.
#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
  Default,
)]
pub struct ClientForm {
  #[serde(default)]
  pub id:          u64,
  #[serde(default)]
  pub nome:        String,
  #[serde(default)]
  pub responsavel: String,
  #[serde(default)]
  pub cep:         String,
  #[serde(default)]
  pub logradouro:  String,
  #[serde(default)]
  pub numero:      String,
  #[serde(default)]
  pub complemento: String,
  #[serde(default)]
  pub bairro:      String,
  #[serde(default)]
  pub cidade:      String,
  #[serde(default)]
  pub estado:      String
}

impl ClientForm {
  pub const FIELDS: [&'static str; 9] = [
    "nome",
    "responsavel",
    "cep",
    "logradouro",
    "numero",
    "complemento",
    "bairro",
    "cidade",
    "estado"
  ];

  pub fn field(
    &self,
    name: &str
  ) -> Option<&str> {
    let value = match name {
      | "nome" => &self.nome,
      | "responsavel" => &self.responsavel,
      | "cep" => &self.cep,
      | "logradouro" => &self.logradouro,
      | "numero" => &self.numero,
      | "complemento" => &self.complemento,
      | "bairro" => &self.bairro,
      | "cidade" => &self.cidade,
      | "estado" => &self.estado,
      | _ => return None
    };
    Some(value)
  }

  pub fn field_mut(
    &mut self,
    name: &str
  ) -> Option<&mut String> {
    let slot = match name {
      | "nome" => &mut self.nome,
      | "responsavel" => {
        &mut self.responsavel
      }
      | "cep" => &mut self.cep,
      | "logradouro" => &mut self.logradouro,
      | "numero" => &mut self.numero,
      | "complemento" => {
        &mut self.complemento
      }
      | "bairro" => &mut self.bairro,
      | "cidade" => &mut self.cidade,
      | "estado" => &mut self.estado,
      | _ => return None
    };
    Some(slot)
  }

  pub fn set_field(
    &mut self,
    name: &str,
    value: &str
  ) -> Result<(), ValidationError> {
    let slot =
      self.field_mut(name).ok_or_else(|| {
        ValidationError::UnknownField(
          name.to_string()
        )
      })?;
    *slot = value.to_string();
    Ok(())
  }

  pub fn validate(
    &self,
    zipcode: &ZipcodeState
  ) -> Result<(), ValidationError> {
    if zipcode.is_invalid() {
      return Err(
        ValidationError::ZipcodeNotConfirmed
      );
    }
    let required = [
      ("nome", &self.nome),
      ("responsavel", &self.responsavel),
      ("cep", &self.cep),
      ("logradouro", &self.logradouro),
      ("numero", &self.numero),
      ("bairro", &self.bairro),
      ("cidade", &self.cidade),
      ("estado", &self.estado)
    ];
    for (name, value) in required {
      if value.trim().is_empty() {
        return Err(ValidationError::Empty(
          name
        ));
      }
    }
    if normalize_zipcode(&self.cep).len()
      != ZIPCODE_LEN
    {
      return Err(
        ValidationError::IncompleteZipcode
      );
    }
    let uf = self.estado.trim();
    if uf.chars().count() != 2
      || !uf.chars().all(char::is_alphabetic)
    {
      return Err(
        ValidationError::InvalidState(
          uf.to_string()
        )
      );
    }
    Ok(())
  }

  /// Forms without a server id are new
  /// clients.
  pub fn is_new(&self) -> bool {
    self.id == 0
  }

  /// Registers a new client. The server
  /// answers with the stored record in
  /// `cliente`, which becomes the patch.
  pub fn create_mutation(
    &self,
    zipcode: &ZipcodeState
  ) -> Result<Mutation, ValidationError> {
    self.validate(zipcode)?;
    let form = self.normalized();
    Ok(Mutation {
      request: ApiRequest::post(
        Endpoint::CreateClient,
        json!(form)
      ),
      effect:  RecordPatch::Client(form)
    })
  }

  pub fn edit_mutation(
    &self,
    zipcode: &ZipcodeState
  ) -> Result<Mutation, ValidationError> {
    if self.id == 0 {
      return Err(
        ValidationError::MissingTarget
      );
    }
    self.validate(zipcode)?;
    let form = self.normalized();
    Ok(Mutation {
      request: ApiRequest::post(
        Endpoint::EditClient(self.id),
        json!(form)
      ),
      effect:  RecordPatch::Client(form)
    })
  }

  fn normalized(&self) -> ClientForm {
    let mut form = self.clone();
    form.estado =
      form.estado.trim().to_uppercase();
    form
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::ZipcodeAddress;
  use crate::dispatch::testing::ScriptedTransport;
  use crate::dispatch::{
    DispatchOutcome,
    Dispatcher
  };

  fn filled() -> ClientForm {
    ClientForm {
      id:          9,
      nome:        "Lab Central".to_string(),
      responsavel: "Ana".to_string(),
      cep:         "01001-000".to_string(),
      logradouro:  "Praça da Sé".to_string(),
      numero:      "100".to_string(),
      complemento: String::new(),
      bairro:      "Sé".to_string(),
      cidade:      "São Paulo".to_string(),
      estado:      "sp".to_string()
    }
  }

  #[test]
  fn short_search_terms_are_refused() {
    assert_eq!(
      search_request(" a "),
      Err(ValidationError::SearchTermTooShort)
    );
    let request =
      search_request("lab").expect("valid term");
    assert_eq!(
      request.path_and_query(),
      "/processos/api/buscar-clientes/?term=lab"
    );
  }

  #[test]
  fn summary_renders_name_and_location() {
    let summary: ClientSummary =
      serde_json::from_str(
        r#"{"id":1,"nome":"Lab Central","cidade":"Campinas","estado":"SP","cep":"13000000"}"#
      )
      .expect("decode summary");
    assert_eq!(
      summary.display(),
      "Lab Central (Campinas/SP)"
    );
  }

  #[test]
  fn invalid_zipcode_blocks_the_edit_before_any_request()
   {
    assert_eq!(
      filled()
        .edit_mutation(&ZipcodeState::NotFound),
      Err(ValidationError::ZipcodeNotConfirmed)
    );
  }

  #[test]
  fn edit_posts_the_form_to_the_client_route() {
    let zipcode = ZipcodeState::Valid(
      ZipcodeAddress::default()
    );
    let mutation = filled()
      .edit_mutation(&zipcode)
      .expect("valid form");
    assert_eq!(
      mutation.request.path(),
      "/processos/api/editar-cliente/9/"
    );
    let body = mutation
      .request
      .body
      .expect("json body");
    assert_eq!(body["estado"], "SP");
    assert_eq!(body["numero"], "100");
  }

  #[tokio::test]
  async fn created_client_comes_back_from_the_server() {
    let mut form = filled();
    form.id = 0;
    assert!(form.is_new());
    assert_eq!(
      form.create_mutation(&ZipcodeState::Incomplete),
      Err(ValidationError::ZipcodeNotConfirmed)
    );

    let mutation = form
      .create_mutation(&ZipcodeState::Idle)
      .expect("valid form");
    assert_eq!(
      mutation.request.path(),
      "/processos/api/criar-cliente/"
    );
    assert_eq!(
      mutation.request.body.as_ref().map(|body| body["estado"].clone()),
      Some(json!("SP"))
    );

    let transport =
      ScriptedTransport::replying(vec![Some(
        serde_json::from_value(json!({
          "status": "success",
          "cliente": {
            "id": 31,
            "nome": "Lab Central",
            "cidade": "São Paulo",
            "estado": "SP"
          }
        }))
        .expect("envelope")
      )]);
    let outcome = Dispatcher::new()
      .dispatch(&transport, mutation)
      .await;
    let DispatchOutcome::Applied {
      record,
      patch: RecordPatch::Client(saved),
      ..
    } = outcome
    else {
      panic!("expected created client");
    };
    assert_eq!(record, None);
    assert_eq!(saved.id, 31);
    assert!(!saved.is_new());
  }

  #[test]
  fn missing_required_field_is_named() {
    let mut form = filled();
    form.set_field("numero", " ")
      .expect("known field");
    assert_eq!(
      form.validate(&ZipcodeState::Idle),
      Err(ValidationError::Empty("numero"))
    );
    assert_eq!(
      form.set_field("telefone", "1"),
      Err(ValidationError::UnknownField(
        "telefone".to_string()
      ))
    );
  }
}
