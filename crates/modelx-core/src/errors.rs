use modelx_core_types::RequestId;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias using ModelXError
pub type Result<T> = std::result::Result<T, ModelXError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// This taxonomy provides a stable, structured classification of all errors
/// raised by the tree operations and the persistence coordinators. Each kind
/// maps to a stable error code that can be used for programmatic error
/// handling, testing, and external reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Structural/Validation
    InvalidInput,
    NotFound,
    AlreadyExists,
    TypeMismatch,
    /// A qualified name does not match what the table of contents declares,
    /// or a Model/Instance reference does not resolve
    Integrity,

    // Codec
    /// A type/value kind outside the closed variant set; never retried
    UnsupportedType,
    /// Malformed document structure
    Parse,

    // Persistence
    /// Project directory could not be created
    Directory,
    /// A single document write failed
    Write,
    /// A required document is missing or unreadable
    Read,
    /// An orphaned document could not be removed
    Delete,
    /// Aggregated failure of a whole commit
    Commit,
    /// Aggregated failure of a whole open
    Open,
    /// The project has no directory registered
    NotRegistered,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::AlreadyExists => "ERR_ALREADY_EXISTS",
            ExErrorKind::TypeMismatch => "ERR_TYPE_MISMATCH",
            ExErrorKind::Integrity => "ERR_INTEGRITY",
            ExErrorKind::UnsupportedType => "ERR_UNSUPPORTED_TYPE",
            ExErrorKind::Parse => "ERR_PARSE",
            ExErrorKind::Directory => "ERR_DIRECTORY",
            ExErrorKind::Write => "ERR_WRITE",
            ExErrorKind::Read => "ERR_READ",
            ExErrorKind::Delete => "ERR_DELETE",
            ExErrorKind::Commit => "ERR_COMMIT",
            ExErrorKind::Open => "ERR_OPEN",
            ExErrorKind::NotRegistered => "ERR_NOT_REGISTERED",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries a classification kind plus optional context for debugging. The
/// coordinators wrap the first underlying failure of a commit/open as the
/// `source` of a single `Commit`/`Open` error.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    qualified_name: Option<String>,
    path: Option<PathBuf>,
    request_id: Option<RequestId>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            qualified_name: None,
            path: None,
            request_id: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add the qualified name of the entity involved
    pub fn with_qualified_name(mut self, name: impl Into<String>) -> Self {
        self.qualified_name = Some(name.into());
        self
    }

    /// Add the file or directory involved
    pub fn with_path(mut self, path: impl AsRef<Path>) -> Self {
        self.path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Add request ID context
    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the qualified name context, if any
    pub fn qualified_name(&self) -> Option<&str> {
        self.qualified_name.as_deref()
    }

    /// Get the path context, if any
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Get the request ID context, if any
    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source error, if any
    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }

    /// Follow the source chain down to the first failure
    pub fn root_cause(&self) -> &ExError {
        let mut current = self;
        while let Some(next) = current.source_error() {
            current = next;
        }
        current
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(name) = &self.qualified_name {
            write!(f, " (qualified_name: {})", name)?;
        }
        if let Some(path) = &self.path {
            write!(f, " (path: {})", path.display())?;
        }
        if let Some(source) = &self.source {
            write!(f, " <- {}", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Domain errors raised by tree operations and value construction
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelXError {
    // ===== Naming =====
    /// Name segment is empty or contains a reserved separator
    #[error("Invalid name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    /// Qualified name is already used by another entity
    #[error("Qualified name already in use: {qualified_name}")]
    AlreadyExists { qualified_name: String },

    // ===== Lookup =====
    #[error("Namespace not found: {qualified_name}")]
    NamespaceNotFound { qualified_name: String },

    #[error("Model not found: {qualified_name}")]
    ModelNotFound { qualified_name: String },

    #[error("Instance not found: {qualified_name}")]
    InstanceNotFound { qualified_name: String },

    #[error("Member '{member}' not found on model {model}")]
    MemberNotFound { model: String, member: String },

    #[error("Field '{field}' not found on instance {instance}")]
    FieldNotFound { instance: String, field: String },

    /// Member names are unique within a Model
    #[error("Member '{member}' already exists on model {model}")]
    DuplicateMember { model: String, member: String },

    // ===== Typing =====
    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    /// Sequence element does not match the declared item type
    #[error("Sequence element {index} has type {found}, expected {expected}")]
    HeterogeneousSequence {
        index: usize,
        expected: String,
        found: String,
    },

    #[error("Invalid {kind} literal: '{literal}'")]
    InvalidLiteral { kind: String, literal: String },

    // ===== References =====
    /// Reference target instance does not exist
    #[error("Reference to unknown instance: {instance}")]
    DanglingReference { instance: String },

    /// Reference target exists but is built from a different model
    #[error("Instance {instance} is of model {found}, reference expects {expected}")]
    ReferenceModelMismatch {
        instance: String,
        expected: String,
        found: String,
    },

    // ===== Mutation =====
    /// Model still has instances and cannot be removed
    #[error("Model {model} is still used by instance {instance}")]
    ModelInUse { model: String, instance: String },

    /// Instance is still the target of a reference
    #[error("Instance {instance} is still referenced by {referrer}")]
    InstanceInUse { instance: String, referrer: String },

    /// The root namespace cannot be removed
    #[error("The root namespace cannot be removed")]
    CannotRemoveRoot,
}

impl From<ModelXError> for ExError {
    fn from(err: ModelXError) -> Self {
        match err {
            ModelXError::InvalidName { name, reason } => ExError::new(ExErrorKind::InvalidInput)
                .with_qualified_name(name)
                .with_message(reason),

            ModelXError::AlreadyExists { qualified_name } => {
                ExError::new(ExErrorKind::AlreadyExists)
                    .with_qualified_name(qualified_name)
                    .with_message("Qualified name already in use")
            }

            ModelXError::NamespaceNotFound { qualified_name } => {
                ExError::new(ExErrorKind::NotFound)
                    .with_qualified_name(qualified_name)
                    .with_message("Namespace not found")
            }

            ModelXError::ModelNotFound { qualified_name } => ExError::new(ExErrorKind::NotFound)
                .with_qualified_name(qualified_name)
                .with_message("Model not found"),

            ModelXError::InstanceNotFound { qualified_name } => {
                ExError::new(ExErrorKind::NotFound)
                    .with_qualified_name(qualified_name)
                    .with_message("Instance not found")
            }

            ModelXError::MemberNotFound { model, member } => ExError::new(ExErrorKind::NotFound)
                .with_qualified_name(model)
                .with_message(format!("Member '{}' not found", member)),

            ModelXError::FieldNotFound { instance, field } => ExError::new(ExErrorKind::NotFound)
                .with_qualified_name(instance)
                .with_message(format!("Field '{}' not found", field)),

            ModelXError::DuplicateMember { model, member } => {
                ExError::new(ExErrorKind::AlreadyExists)
                    .with_qualified_name(model)
                    .with_message(format!("Member '{}' already exists", member))
            }

            ModelXError::TypeMismatch { expected, found } => {
                ExError::new(ExErrorKind::TypeMismatch)
                    .with_message(format!("expected {}, found {}", expected, found))
            }

            ModelXError::HeterogeneousSequence {
                index,
                expected,
                found,
            } => ExError::new(ExErrorKind::TypeMismatch).with_message(format!(
                "sequence element {} has type {}, expected {}",
                index, found, expected
            )),

            ModelXError::InvalidLiteral { kind, literal } => {
                ExError::new(ExErrorKind::InvalidInput)
                    .with_message(format!("invalid {} literal '{}'", kind, literal))
            }

            ModelXError::DanglingReference { instance } => ExError::new(ExErrorKind::Integrity)
                .with_qualified_name(instance)
                .with_message("Referenced instance does not exist"),

            ModelXError::ReferenceModelMismatch {
                instance,
                expected,
                found,
            } => ExError::new(ExErrorKind::Integrity)
                .with_qualified_name(instance)
                .with_message(format!(
                    "Referenced instance is of model {}, expected {}",
                    found, expected
                )),

            ModelXError::ModelInUse { model, instance } => ExError::new(ExErrorKind::InvalidInput)
                .with_qualified_name(model)
                .with_message(format!("Model is still used by instance {}", instance)),

            ModelXError::InstanceInUse { instance, referrer } => {
                ExError::new(ExErrorKind::InvalidInput)
                    .with_qualified_name(instance)
                    .with_message(format!("Instance is still referenced by {}", referrer))
            }

            ModelXError::CannotRemoveRoot => ExError::new(ExErrorKind::InvalidInput)
                .with_message("The root namespace cannot be removed"),
        }
    }
}
