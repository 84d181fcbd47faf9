//! Descriptor builders and a recording post-processor shared by the tests.

use crate::descriptor::{
    Attribute, AttributeKind, DataSource, DataSourceApi, PaginateApi, PaginateHooks, Requiredness,
    Resource, ResourceApi, SimpleApi,
};
use crate::error::Result;
use crate::format::PostProcessor;
use std::cell::RefCell;
use std::path::{Path, PathBuf};

/// A computed attribute with no annotations.
pub fn attribute(name: &str, kind: AttributeKind) -> Attribute {
    Attribute {
        name: name.to_owned(),
        description: format!("The {}.", name.replace('_', " ")),
        requiredness: Requiredness::Computed,
        nullable: false,
        sensitive: false,
        validators: Vec::new(),
        plan_modifiers: Vec::new(),
        kind,
    }
}

pub fn required(name: &str, kind: AttributeKind) -> Attribute {
    Attribute {
        requiredness: Requiredness::Required,
        ..attribute(name, kind)
    }
}

/// A computed `set_nested` attribute.
pub fn nested(name: &str, attributes: Vec<Attribute>) -> Attribute {
    attribute(name, AttributeKind::SetNested { attributes })
}

pub fn simple_data_source(name: &str, model: &str, attributes: Vec<Attribute>) -> DataSource {
    DataSource {
        name: name.to_owned(),
        description: format!("Retrieves a {}.", name),
        api: DataSourceApi::Simple(SimpleApi {
            model: model.to_owned(),
            read_method: format!("Retrieve{}", model),
            read_request_attributes: Vec::new(),
        }),
        attributes,
    }
}

pub fn paginated_data_source(name: &str, model: &str, attributes: Vec<Attribute>) -> DataSource {
    DataSource {
        name: name.to_owned(),
        description: format!("Lists {}.", name),
        api: DataSourceApi::Paginate(PaginateApi {
            model: model.to_owned(),
            read_method: format!("List{}s", model),
            read_request_attributes: Vec::new(),
            results_attribute: None,
            limit_attribute: None,
            page_size: 100,
            hooks: PaginateHooks::default(),
        }),
        attributes,
    }
}

pub fn resource(name: &str, model: &str, attributes: Vec<Attribute>) -> Resource {
    Resource {
        name: name.to_owned(),
        description: format!("Manages a {}.", name),
        api: ResourceApi {
            model: model.to_owned(),
            create_method: format!("Create{}", model),
            create_request_attributes: Vec::new(),
            read_method: format!("Retrieve{}", model),
            read_request_attributes: vec!["id".to_owned()],
            update_method: Some(format!("Update{}", model)),
            update_request_attributes: vec!["id".to_owned()],
            delete_method: Some(format!("Delete{}", model)),
            delete_request_attributes: vec!["id".to_owned()],
        },
        import_key_attributes: vec!["id".to_owned()],
        attributes,
    }
}

/// Post-processor that only remembers which files it was handed.
#[derive(Debug, Default)]
pub struct RecordingPostProcessor {
    pub processed: RefCell<Vec<PathBuf>>,
}

impl PostProcessor for RecordingPostProcessor {
    fn process(&self, path: &Path) -> Result<()> {
        self.processed.borrow_mut().push(path.to_owned());
        Ok(())
    }
}
