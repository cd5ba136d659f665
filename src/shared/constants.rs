// =============================================================================
// PROBLEM LINK DEFAULTS
// =============================================================================

/// Status of a freshly opened problem link
pub const STATUS_PENDING: &str = "pending";

/// Status that closes a problem link
pub const STATUS_SOLVED: &str = "solved";

/// Priority given to a problem link when the client omits it
pub const PRIORITY_NORMAL: &str = "normal";

// =============================================================================
// RESPONSE MESSAGES
// =============================================================================

pub const MSG_CREATED: &str = "Dado cadastrado com sucesso";

pub const MSG_RETRIEVED: &str = "Dados recuperados com sucesso";

pub const MSG_UPDATED: &str = "Dados atualizados com sucesso";

pub const MSG_RESOLVED: &str = "Chamado marcado como resolvido";

pub const MSG_NOT_FOUND: &str = "Chamado não encontrado";

pub const MSG_PROCESSING_ERROR: &str = "Erro ao processar dados";

pub const MSG_ATTENDANT_PROTECTED: &str =
    "O nome do atendente não pode ser alterado após a abertura do chamado";
