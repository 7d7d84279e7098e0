/// Erros do meio de armazenamento (slots nomeados).
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("I/O: {0}")]
    Io(#[from] std::io::Error),
    #[error("cota excedida no slot '{slot}': {needed} bytes, limite {quota}")]
    QuotaExceeded {
        slot: String,
        needed: usize,
        quota: usize,
    },
    #[error("falha ao serializar: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("nome de slot inválido: {0}")]
    InvalidSlot(String),
}

/// Tipo de mídia anexada a um anúncio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
    Audio,
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            MediaKind::Image => "imagens",
            MediaKind::Video => "vídeos",
            MediaKind::Audio => "áudios",
        };
        f.write_str(s)
    }
}

/// Erros de validação de um rascunho de anúncio.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("campo obrigatório ausente: {0}")]
    MissingField(&'static str),
    #[error("preço inválido: {0}")]
    InvalidPrice(f64),
    #[error("o anúncio precisa de ao menos uma imagem, vídeo ou áudio")]
    NoMedia,
    #[error("máximo de {max} {kind} por anúncio")]
    TooManyMedia { kind: MediaKind, max: usize },
    #[error("informe ao menos um telefone ou e-mail para contato")]
    NoContact,
}
