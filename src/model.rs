//! Assembly of the Go record types backing an entity's state.

use crate::descriptor::Attribute;
use crate::error::{Error, Result};
use crate::translate::{camelize, synthetic_type_name, value_type};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq)]
pub struct ModelField {
    pub name: String,
    pub value_type: String,
    pub tfsdk: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModelType {
    pub name: String,
    pub fields: Vec<ModelField>,
}

/// Record types for `attributes`: the root type named `root` first, then one
/// type per nested attribute, depth first in declaration order.
///
/// `entity` only labels errors.
pub fn assemble(entity: &str, root: &str, attributes: &[Attribute]) -> Result<Vec<ModelType>> {
    let mut assembler = Assembler {
        entity,
        types: Vec::new(),
        names: HashSet::new(),
    };
    assembler.names.insert(root.to_owned());
    assembler.visit(root, attributes)?;
    Ok(assembler.types)
}

struct Assembler<'a> {
    entity: &'a str,
    types: Vec<ModelType>,
    names: HashSet<String>,
}

impl<'a> Assembler<'a> {
    fn visit(&mut self, name: &str, attributes: &[Attribute]) -> Result<()> {
        let mut seen = HashSet::new();
        let mut field_names = HashSet::new();
        let mut fields = Vec::with_capacity(attributes.len());
        for attribute in attributes {
            if !seen.insert(attribute.name.as_str()) {
                return Err(Error::DuplicateAttribute {
                    entity: self.entity.to_owned(),
                    attribute: attribute.name.clone(),
                });
            }
            let field = camelize(&attribute.name);
            if !field_names.insert(field.clone()) {
                return Err(Error::FieldNameCollision {
                    entity: self.entity.to_owned(),
                    attribute: attribute.name.clone(),
                    field,
                });
            }
            fields.push(ModelField {
                name: field,
                value_type: value_type(attribute, name),
                tfsdk: attribute.name.clone(),
            });
        }

        // Parent before its nested types.
        self.types.push(ModelType {
            name: name.to_owned(),
            fields,
        });

        for attribute in attributes {
            if let Some(children) = attribute.children() {
                let type_name = synthetic_type_name(name, attribute);
                if !self.names.insert(type_name.clone()) {
                    return Err(Error::TypeNameCollision {
                        entity: self.entity.to_owned(),
                        attribute: attribute.name.clone(),
                        type_name,
                    });
                }
                self.visit(&type_name, children)?;
            }
        }
        Ok(())
    }
}

impl ModelType {
    /// Go declaration of the record.
    pub fn declaration(&self) -> String {
        let mut out = format!("type {} struct {{\n", self.name);
        for field in &self.fields {
            out.push_str(&format!(
                "\t{} {} `tfsdk:\"{}\"`\n",
                field.name, field.value_type, field.tfsdk
            ));
        }
        out.push('}');
        out
    }
}
