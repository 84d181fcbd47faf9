//! One generation run: select, generate in memory, write, post-process.

use crate::config::CodeGeneratorConfig;
use crate::descriptor::{Catalog, Entity};
use crate::entity::{self, GeneratedFile};
use crate::error::{Error, Result};
use crate::format::PostProcessor;
use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

/// Entities of `catalog` whose name is `filter`, or all of them.
pub fn select<'a>(catalog: &'a Catalog, filter: Option<&str>) -> Result<Vec<Entity<'a>>> {
    let selected: Vec<_> = catalog
        .entities()
        .filter(|entity| filter.map_or(true, |name| entity.name() == name))
        .collect();
    if let Some(name) = filter {
        if selected.is_empty() {
            return Err(Error::UnknownEntity(name.to_owned()));
        }
    }

    // One file per entity: a repeated kind and name would overwrite its twin.
    let mut file_names = HashSet::new();
    for entity in &selected {
        if !file_names.insert(entity.file_name()) {
            return Err(Error::DuplicateEntity(entity.label()));
        }
    }
    Ok(selected)
}

/// Generate, write and post-process the provider sources.
///
/// Nothing is written unless every selected entity generates. Returns the
/// written paths in catalog order.
pub fn generate_provider(
    catalog: &Catalog,
    config: &CodeGeneratorConfig,
    filter: Option<&str>,
    post_processor: &dyn PostProcessor,
) -> Result<Vec<PathBuf>> {
    let files = select(catalog, filter)?
        .into_iter()
        .map(|entity| entity::generate(entity, config))
        .collect::<Result<Vec<GeneratedFile>>>()?;

    let output_dir = config.output_dir();
    fs::create_dir_all(output_dir).map_err(|source| Error::Io {
        path: output_dir.clone(),
        source,
    })?;

    let mut written = Vec::with_capacity(files.len());
    for file in files {
        let path = output_dir.join(&file.file_name);
        fs::write(&path, file.code.as_bytes()).map_err(|source| Error::Io {
            path: path.clone(),
            source,
        })?;
        tracing::info!(path = %path.display(), "wrote");
        written.push(path);
    }

    for path in &written {
        post_processor.process(path)?;
    }
    Ok(written)
}
