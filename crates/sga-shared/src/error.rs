use thiserror::Error;

/// Client-side validation failures.
/// These block submission and never
/// reach the network.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
  #[error("campo obrigatório vazio: {0}")]
  Empty(&'static str),

  #[error("nenhum processo selecionado")]
  MissingTarget,

  #[error("identificador inválido: {0:?}")]
  InvalidTarget(String),

  #[error("status desconhecido: {0:?}")]
  UnknownStatus(String),

  #[error(
    "código de rastreio com {len} caracteres (máximo 13)"
  )]
  TrackingCodeTooLong { len: usize },

  #[error("CEP incompleto (deve ter 8 dígitos).")]
  IncompleteZipcode,

  #[error("CEP Inválido. Corrija para prosseguir.")]
  ZipcodeNotConfirmed,

  #[error("UF deve ter 2 letras: {0:?}")]
  InvalidState(String),

  #[error("termo de busca muito curto")]
  SearchTermTooShort,

  #[error("campo desconhecido: {0:?}")]
  UnknownField(String)
}
