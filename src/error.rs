use std::path::PathBuf;
use std::process::ExitStatus;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Everything that can abort a generation run.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("attribute `{attribute}` referenced by `{binding}` not found in {entity}")]
    UnknownAttribute {
        entity: String,
        attribute: String,
        binding: &'static str,
    },

    #[error("attribute `{attribute}` referenced by `{binding}` in {entity} is not a scalar")]
    NonScalarBinding {
        entity: String,
        attribute: String,
        binding: &'static str,
    },

    #[error("attribute `{attribute}` is declared more than once in {entity}")]
    DuplicateAttribute { entity: String, attribute: String },

    #[error("attributes of {entity} map to the same Go field `{field}`; `{attribute}` collides with an earlier sibling")]
    FieldNameCollision {
        entity: String,
        attribute: String,
        field: String,
    },

    #[error("type `{type_name}` generated for attribute `{attribute}` in {entity} collides with an existing type")]
    TypeNameCollision {
        entity: String,
        attribute: String,
        type_name: String,
    },

    #[error("attribute `{attribute}` of type `{kind}` has no primitive representation")]
    NotScalar { attribute: String, kind: &'static str },

    #[error("{entity} declares {count} import key attributes, expected 1 or 2")]
    InvalidImportKey { entity: String, count: usize },

    #[error("cannot select the results attribute of {entity}: {reason}")]
    InvalidResultsAttribute { entity: String, reason: String },

    #[error("{entity} declares a page size of 0")]
    InvalidPageSize { entity: String },

    #[error("limit attribute `{attribute}` of {entity} must be an int")]
    InvalidLimitAttribute { entity: String, attribute: String },

    #[error("no entity named `{0}`")]
    UnknownEntity(String),

    #[error("{0} is declared more than once")]
    DuplicateEntity(String),

    #[error("invalid descriptor catalog")]
    Catalog(#[from] serde_json::Error),

    #[error("I/O error on {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to emit code")]
    Emit(#[from] std::io::Error),

    #[error("failed to run `{command}` on {}", path.display())]
    FormatterSpawn {
        command: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` exited with {status} on {}", path.display())]
    Formatter {
        command: String,
        path: PathBuf,
        status: ExitStatus,
    },
}
