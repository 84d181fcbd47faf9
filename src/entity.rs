//! Per-entity generation: picks the strategy dictated by the entity's API
//! binding and writes the complete Go file.

use crate::config::CodeGeneratorConfig;
use crate::descriptor::{
    Attribute, AttributeKind, DataSource, DataSourceApi, Entity, PaginateApi, Resource,
    ResourceApi, SimpleApi,
};
use crate::emit::GoEmitter;
use crate::error::{Error, Result};
use crate::model::{self, ModelType};
use crate::translate::{
    assign_value, camelize, from_primitive_stmt, go_string, schema_attributes, to_primitive_expr,
};
use convert_case::{Case, Casing};
use std::io::Write;

const DATA_SOURCE_PACKAGES: [&str; 4] = [
    "datasource",
    "datasource/schema",
    "diag",
    "schema/validator",
];

const RESOURCE_PACKAGES: [&str; 6] = [
    "diag",
    "path",
    "resource",
    "resource/schema",
    "resource/schema/planmodifier",
    "schema/validator",
];

/// One emitted source unit.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedFile {
    pub file_name: String,
    pub code: String,
}

/// How an entity talks to the remote API.
#[derive(Debug, Clone, Copy)]
pub enum Strategy<'a> {
    /// One read call keyed by identifier attributes.
    Simple(&'a SimpleApi),
    /// Cursor-following read loop.
    Paginate(&'a PaginateApi),
    /// Full resource lifecycle.
    Crud(&'a ResourceApi),
}

impl<'a> Strategy<'a> {
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Simple(_) => "simple",
            Strategy::Paginate(_) => "paginate",
            Strategy::Crud(_) => "crud",
        }
    }

    pub fn of(entity: Entity<'a>) -> Self {
        match entity {
            Entity::DataSource(data_source) => match &data_source.api {
                DataSourceApi::Simple(api) => Strategy::Simple(api),
                DataSourceApi::Paginate(api) => Strategy::Paginate(api),
            },
            Entity::Resource(resource) => Strategy::Crud(&resource.api),
        }
    }
}

/// Generate the Go file for `entity`.
pub fn generate(entity: Entity<'_>, config: &CodeGeneratorConfig) -> Result<GeneratedFile> {
    tracing::debug!(strategy = Strategy::of(entity).name(), "generating {}", entity.label());
    let code = match entity {
        Entity::DataSource(data_source) => generate_data_source(data_source, config)?,
        Entity::Resource(resource) => generate_resource(resource, config)?,
    };
    Ok(GeneratedFile {
        file_name: entity.file_name(),
        code,
    })
}

/// Resolve the attributes named by an API binding list.
pub fn resolve_binding<'a>(
    entity: Entity<'a>,
    binding: &'static str,
    names: &[String],
) -> Result<Vec<&'a Attribute>> {
    names
        .iter()
        .map(|name| {
            entity
                .attributes()
                .iter()
                .find(|attribute| &attribute.name == name)
                .ok_or_else(|| Error::UnknownAttribute {
                    entity: entity.label(),
                    attribute: name.clone(),
                    binding,
                })
        })
        .collect()
}

/// Go arguments read from `data` for each attribute of an API binding.
fn request_params(entity: Entity<'_>, binding: &'static str, names: &[String]) -> Result<Vec<String>> {
    resolve_binding(entity, binding, names)?
        .into_iter()
        .map(|attribute| {
            if !attribute.is_scalar() {
                return Err(Error::NonScalarBinding {
                    entity: entity.label(),
                    attribute: attribute.name.clone(),
                    binding,
                });
            }
            to_primitive_expr(attribute, "data")
        })
        .collect()
}

/// The `set_nested` attribute receiving paginated results.
fn results_attribute<'a>(data_source: &'a DataSource, api: &PaginateApi) -> Result<&'a Attribute> {
    let entity = Entity::DataSource(data_source);
    let is_nested = |attribute: &&Attribute| matches!(attribute.kind, AttributeKind::SetNested { .. });

    match &api.results_attribute {
        Some(name) => {
            let attribute = resolve_binding(entity, "results_attribute", std::slice::from_ref(name))?
                .remove(0);
            if is_nested(&attribute) {
                Ok(attribute)
            } else {
                Err(Error::InvalidResultsAttribute {
                    entity: entity.label(),
                    reason: format!("`{}` is not a set_nested attribute", name),
                })
            }
        }
        None => {
            let mut candidates = data_source.attributes.iter().filter(is_nested);
            match (candidates.next(), candidates.next()) {
                (Some(attribute), None) => Ok(attribute),
                (None, _) => Err(Error::InvalidResultsAttribute {
                    entity: entity.label(),
                    reason: "no set_nested attribute declared".to_owned(),
                }),
                (Some(_), Some(_)) => Err(Error::InvalidResultsAttribute {
                    entity: entity.label(),
                    reason: "several set_nested attributes declared, name one".to_owned(),
                }),
            }
        }
    }
}

fn limit_attribute<'a>(data_source: &'a DataSource, api: &PaginateApi) -> Result<Option<&'a Attribute>> {
    let name = match &api.limit_attribute {
        Some(name) => name,
        None => return Ok(None),
    };
    let entity = Entity::DataSource(data_source);
    let attribute = resolve_binding(entity, "limit_attribute", std::slice::from_ref(name))?.remove(0);
    match attribute.kind {
        AttributeKind::Int => Ok(Some(attribute)),
        _ => Err(Error::InvalidLimitAttribute {
            entity: entity.label(),
            attribute: name.clone(),
        }),
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum NotFound {
    Fail,
    RemoveFromState,
    Ignore,
}

/// A `<Method>WithResponse` call followed by its error and status checks.
struct ClientCall<'a> {
    receiver: &'a str,
    method: &'a str,
    args: Vec<String>,
    action: &'a str,
    not_found: NotFound,
    expects_body: bool,
}

fn output_client_call<T: Write>(out: &mut GoEmitter<T>, call: &ClientCall<'_>) -> Result<()> {
    out.line(&format!(
        "httpResp, err := {}.client.{}WithResponse({})",
        call.receiver,
        call.method,
        call.args.join(", ")
    ))?;
    out.open("if err != nil {")?;
    out.line(&format!(
        "resp.Diagnostics.AddError(\"Client Error\", fmt.Sprintf(\"Unable to {}, got error: %s\", err))",
        call.action
    ))?;
    out.line("return")?;
    match call.not_found {
        NotFound::Fail => {}
        NotFound::RemoveFromState => {
            out.branch("} else if httpResp.StatusCode() == http.StatusNotFound {")?;
            out.line("resp.Diagnostics.AddWarning(\"Resource not found\", \"The resource was not found on the server, removing it from state.\")")?;
            out.line("resp.State.RemoveResource(ctx)")?;
            out.line("return")?;
        }
        NotFound::Ignore => {
            out.branch("} else if httpResp.StatusCode() == http.StatusNotFound {")?;
            out.line("return")?;
        }
    }
    if call.expects_body {
        out.branch("} else if httpResp.StatusCode() != http.StatusOK {")?;
    } else {
        out.branch(
            "} else if httpResp.StatusCode() != http.StatusOK && httpResp.StatusCode() != http.StatusNoContent {",
        )?;
    }
    out.line(&format!(
        "resp.Diagnostics.AddError(\"Client Error\", fmt.Sprintf(\"Unable to {}, got status code %d: %s\", httpResp.StatusCode(), string(httpResp.Body)))",
        call.action
    ))?;
    out.line("return")?;
    if call.expects_body {
        out.branch("} else if httpResp.JSON200 == nil {")?;
        out.line(&format!(
            "resp.Diagnostics.AddError(\"Client Error\", \"Unable to {}, got empty response body\")",
            call.action
        ))?;
        out.line("return")?;
    }
    out.close("}")?;
    out.blank()?;
    Ok(())
}

fn output_diagnostics_append<T: Write>(out: &mut GoEmitter<T>, expr: &str) -> Result<()> {
    out.line(&format!("resp.Diagnostics.Append({}...)", expr))?;
    out.open("if resp.Diagnostics.HasError() {")?;
    out.line("return")?;
    out.close("}")?;
    out.blank()?;
    Ok(())
}

fn output_constructor<T: Write>(
    out: &mut GoEmitter<T>,
    entity: Entity<'_>,
    type_name: &str,
    interface: &str,
    base: &str,
    description: &str,
) -> Result<()> {
    out.open(&format!("func New{}() {} {{", type_name, interface))?;
    out.line(&format!("return &{}{{}}", type_name))?;
    out.close("}")?;
    out.blank()?;
    out.output_comment(&format!(
        "{} implements {}.\n\n{}",
        type_name,
        entity.label(),
        description
    ))?;
    out.open(&format!("type {} struct {{", type_name))?;
    out.line(base)?;
    out.close("}")?;
    out.blank()?;
    Ok(())
}

fn output_metadata<T: Write>(
    out: &mut GoEmitter<T>,
    receiver: &str,
    type_name: &str,
    package: &str,
    name: &str,
) -> Result<()> {
    out.open(&format!(
        "func ({} *{}) Metadata(ctx context.Context, req {}.MetadataRequest, resp *{}.MetadataResponse) {{",
        receiver, type_name, package, package
    ))?;
    out.line(&format!(
        "resp.TypeName = req.ProviderTypeName + {}",
        go_string(&format!("_{}", name))
    ))?;
    out.close("}")?;
    out.blank()?;
    Ok(())
}

fn output_schema<T: Write>(
    out: &mut GoEmitter<T>,
    receiver: &str,
    type_name: &str,
    package: &str,
    description: &str,
    model_name: &str,
    attributes: &[Attribute],
) -> Result<()> {
    out.open(&format!(
        "func ({} *{}) Schema(ctx context.Context, req {}.SchemaRequest, resp *{}.SchemaResponse) {{",
        receiver, type_name, package, package
    ))?;
    out.open("resp.Schema = schema.Schema{")?;
    out.line(&format!("MarkdownDescription: {},", go_string(description)))?;
    out.fragment(&schema_attributes(attributes, model_name))?;
    out.close("}")?;
    out.close("}")?;
    out.blank()?;
    Ok(())
}

fn output_models<T: Write>(out: &mut GoEmitter<T>, models: &[ModelType]) -> Result<()> {
    for model in models {
        out.fragment(&model.declaration())?;
        out.blank()?;
    }
    Ok(())
}

fn output_fill<T: Write>(
    out: &mut GoEmitter<T>,
    model_name: &str,
    source_type: &str,
    statements: &[String],
) -> Result<()> {
    out.open(&format!(
        "func (m *{}) Fill(ctx context.Context, data {}) diag.Diagnostics {{",
        model_name, source_type
    ))?;
    for statement in statements {
        out.fragment(statement)?;
    }
    out.line("return nil")?;
    out.close("}")?;
    Ok(())
}

fn finish(buffer: Vec<u8>) -> String {
    String::from_utf8_lossy(&buffer).into_owned()
}

pub fn generate_data_source(
    data_source: &DataSource,
    config: &CodeGeneratorConfig,
) -> Result<String> {
    let entity = Entity::DataSource(data_source);
    tracing::info!(data_source = %data_source.name, "generating data source");

    let type_name = format!("{}DataSource", camelize(&data_source.name));
    let model_name = format!("{}Model", type_name);
    let models = model::assemble(&entity.label(), &model_name, &data_source.attributes)?;

    let mut buffer = Vec::new();
    {
        let mut out = GoEmitter::new(&mut buffer, config);
        out.output_preamble(&DATA_SOURCE_PACKAGES)?;
        out.line(&format!("var _ datasource.DataSource = &{}{{}}", type_name))?;
        out.blank()?;
        output_constructor(
            &mut out,
            entity,
            &type_name,
            "datasource.DataSource",
            "baseDataSource",
            &data_source.description,
        )?;
        output_metadata(&mut out, "d", &type_name, "datasource", &data_source.name)?;
        output_schema(
            &mut out,
            "d",
            &type_name,
            "datasource",
            &data_source.description,
            &model_name,
            &data_source.attributes,
        )?;

        out.open(&format!(
            "func (d *{}) Read(ctx context.Context, req datasource.ReadRequest, resp *datasource.ReadResponse) {{",
            type_name
        ))?;
        out.line(&format!("var data {}", model_name))?;
        out.blank()?;
        output_diagnostics_append(&mut out, "req.Config.Get(ctx, &data)")?;
        let (fill_source, fill_statements) = match &data_source.api {
            DataSourceApi::Simple(api) => {
                output_simple_read(&mut out, data_source, api)?;
                let statements = data_source
                    .attributes
                    .iter()
                    .map(|attribute| from_primitive_stmt(attribute, &model_name, "data", "m"))
                    .collect::<Vec<_>>();
                (format!("apiclient.{}", api.model), statements)
            }
            DataSourceApi::Paginate(api) => {
                let results = results_attribute(data_source, api)?;
                output_paginated_read(&mut out, data_source, api)?;
                // The accumulated slice is never a pointer.
                let results = Attribute {
                    nullable: false,
                    ..results.clone()
                };
                let statement = assign_value(
                    &results,
                    &model_name,
                    "data",
                    &format!("m.{}", camelize(&results.name)),
                    0,
                );
                (format!("[]apiclient.{}", api.model), vec![statement])
            }
        };
        out.line("resp.Diagnostics.Append(resp.State.Set(ctx, &data)...)")?;
        out.close("}")?;
        out.blank()?;

        output_models(&mut out, &models)?;
        output_fill(&mut out, &model_name, &fill_source, &fill_statements)?;
    }
    Ok(finish(buffer))
}

fn output_simple_read<T: Write>(
    out: &mut GoEmitter<T>,
    data_source: &DataSource,
    api: &SimpleApi,
) -> Result<()> {
    let keys = if api.read_request_attributes.is_empty() {
        vec!["id".to_owned()]
    } else {
        api.read_request_attributes.clone()
    };
    let mut args = vec!["ctx".to_owned()];
    args.extend(request_params(
        Entity::DataSource(data_source),
        "read_request_attributes",
        &keys,
    )?);

    output_client_call(
        out,
        &ClientCall {
            receiver: "d",
            method: &api.read_method,
            args,
            action: "read",
            not_found: NotFound::Fail,
            expects_body: true,
        },
    )?;
    output_diagnostics_append(out, "data.Fill(ctx, *httpResp.JSON200)")
}

fn output_paginated_read<T: Write>(
    out: &mut GoEmitter<T>,
    data_source: &DataSource,
    api: &PaginateApi,
) -> Result<()> {
    if api.page_size == 0 {
        return Err(Error::InvalidPageSize {
            entity: Entity::DataSource(data_source).label(),
        });
    }
    let limit = limit_attribute(data_source, api)?;
    let mut args = vec!["ctx".to_owned()];
    args.extend(request_params(
        Entity::DataSource(data_source),
        "read_request_attributes",
        &api.read_request_attributes,
    )?);
    args.push("params".to_owned());

    out.line(&format!("var modelInstances []apiclient.{}", api.model))?;
    out.open(&format!("params := &apiclient.{}Params{{", api.read_method))?;
    out.line(&format!("Limit: ptr.Ptr(int64({})),", api.page_size))?;
    out.close("}")?;
    out.blank()?;

    let limit_field = limit.map(|attribute| format!("data.{}", camelize(&attribute.name)));
    if let Some(field) = &limit_field {
        out.open(&format!(
            "if !{0}.IsNull() && {0}.ValueInt64() < {1} {{",
            field, api.page_size
        ))?;
        out.line(&format!("params.Limit = ptr.Ptr({}.ValueInt64())", field))?;
        out.close("}")?;
        out.blank()?;
    }
    out.hook(api.hooks.read_init_loop.as_deref())?;

    out.line("done:")?;
    out.open("for {")?;
    if let Some(field) = &limit_field {
        out.open(&format!("if !{}.IsNull() {{", field))?;
        out.line(&format!(
            "remaining := {}.ValueInt64() - int64(len(modelInstances))",
            field
        ))?;
        out.open("if remaining <= 0 {")?;
        out.line("break done")?;
        out.close("}")?;
        out.open(&format!("if remaining < {} {{", api.page_size))?;
        out.line("params.Limit = ptr.Ptr(remaining)")?;
        out.close("}")?;
        out.close("}")?;
        out.blank()?;
    }
    out.hook(api.hooks.read_pre_iterate.as_deref())?;

    output_client_call(
        out,
        &ClientCall {
            receiver: "d",
            method: &api.read_method,
            args,
            action: "read",
            not_found: NotFound::Fail,
            expects_body: true,
        },
    )?;
    out.open("if len(httpResp.JSON200.Data) == 0 {")?;
    out.line("break done")?;
    out.close("}")?;
    out.line("modelInstances = append(modelInstances, httpResp.JSON200.Data...)")?;
    out.blank()?;

    if let Some(field) = &limit_field {
        out.open(&format!(
            "if !{0}.IsNull() && int64(len(modelInstances)) >= {0}.ValueInt64() {{",
            field
        ))?;
        out.line(&format!(
            "modelInstances = modelInstances[:{}.ValueInt64()]",
            field
        ))?;
        out.line("break done")?;
        out.close("}")?;
        out.blank()?;
    }
    out.hook(api.hooks.read_post_iterate.as_deref())?;

    // Case labels sit at the depth of their `switch`.
    out.line("switch v := any(httpResp.JSON200.HasMore).(type) {")?;
    out.open("case bool:")?;
    out.open("if !v {")?;
    out.line("break done")?;
    out.close("}")?;
    out.branch("case *bool:")?;
    out.open("if v == nil || !*v {")?;
    out.line("break done")?;
    out.close("}")?;
    out.close("}")?;
    out.blank()?;

    out.line("switch v := any(httpResp.JSON200.LastId).(type) {")?;
    out.open("case string:")?;
    out.line("params.After = &v")?;
    out.branch("case *string:")?;
    out.line("params.After = v")?;
    out.close("}")?;
    out.close("}")?;
    out.blank()?;

    output_diagnostics_append(out, "data.Fill(ctx, modelInstances)")
}

pub fn generate_resource(resource: &Resource, config: &CodeGeneratorConfig) -> Result<String> {
    let entity = Entity::Resource(resource);
    tracing::info!(resource = %resource.name, "generating resource");

    let type_name = format!("{}Resource", camelize(&resource.name));
    let model_name = format!("{}Model", type_name);
    let models = model::assemble(&entity.label(), &model_name, &resource.attributes)?;

    if resource.import_key_attributes.len() > 2 {
        return Err(Error::InvalidImportKey {
            entity: entity.label(),
            count: resource.import_key_attributes.len(),
        });
    }
    let import_keys = resolve_binding(entity, "import_key_attributes", &resource.import_key_attributes)?;

    let api = &resource.api;
    let mut buffer = Vec::new();
    {
        let mut out = GoEmitter::new(&mut buffer, config);
        out.output_preamble(&RESOURCE_PACKAGES)?;
        out.line(&format!("var _ resource.Resource = &{}{{}}", type_name))?;
        if !import_keys.is_empty() {
            out.line(&format!(
                "var _ resource.ResourceWithImportState = &{}{{}}",
                type_name
            ))?;
        }
        out.blank()?;
        output_constructor(
            &mut out,
            entity,
            &type_name,
            "resource.Resource",
            "baseResource",
            &resource.description,
        )?;
        output_metadata(&mut out, "r", &type_name, "resource", &resource.name)?;
        output_schema(
            &mut out,
            "r",
            &type_name,
            "resource",
            &resource.description,
            &model_name,
            &resource.attributes,
        )?;

        let lifecycle = Lifecycle {
            entity,
            type_name: &type_name,
            model_name: &model_name,
        };
        lifecycle.output_write(
            &mut out,
            "Create",
            Some(api.create_method.as_str()),
            "create_request_attributes",
            &api.create_request_attributes,
        )?;
        lifecycle.output_read(&mut out, api)?;
        lifecycle.output_write(
            &mut out,
            "Update",
            api.update_method.as_deref(),
            "update_request_attributes",
            &api.update_request_attributes,
        )?;
        lifecycle.output_delete(&mut out, api)?;
        if !import_keys.is_empty() {
            lifecycle.output_import_state(&mut out, &import_keys)?;
        }

        output_models(&mut out, &models)?;
        let statements = resource
            .attributes
            .iter()
            .map(|attribute| from_primitive_stmt(attribute, &model_name, "data", "m"))
            .collect::<Vec<_>>();
        output_fill(
            &mut out,
            &model_name,
            &format!("apiclient.{}", api.model),
            &statements,
        )?;
    }
    Ok(finish(buffer))
}

/// Emits the lifecycle methods of one resource.
struct Lifecycle<'a> {
    entity: Entity<'a>,
    type_name: &'a str,
    model_name: &'a str,
}

impl<'a> Lifecycle<'a> {
    fn open_method<T: Write>(&self, out: &mut GoEmitter<T>, operation: &str) -> Result<()> {
        out.open(&format!(
            "func (r *{0}) {1}(ctx context.Context, req resource.{1}Request, resp *resource.{1}Response) {{",
            self.type_name, operation
        ))?;
        Ok(())
    }

    fn load_data<T: Write>(&self, out: &mut GoEmitter<T>, source: &str) -> Result<()> {
        out.line(&format!("var data {}", self.model_name))?;
        out.blank()?;
        output_diagnostics_append(out, &format!("req.{}.Get(ctx, &data)", source))
    }

    fn output_unsupported<T: Write>(&self, out: &mut GoEmitter<T>, operation: &str) -> Result<()> {
        self.open_method(out, operation)?;
        out.line(&format!(
            "resp.Diagnostics.AddError(\"Not Supported\", {})",
            go_string(&format!(
                "{} is not supported for {}.",
                operation,
                self.entity.label()
            ))
        ))?;
        out.close("}")?;
        out.blank()?;
        Ok(())
    }

    /// Create or Update: plan in, request body from the hand-written
    /// `get<Operation>JSONRequestBody`, state out.
    fn output_write<T: Write>(
        &self,
        out: &mut GoEmitter<T>,
        operation: &str,
        method: Option<&str>,
        binding: &'static str,
        request_attributes: &[String],
    ) -> Result<()> {
        let method = match method {
            Some(method) => method,
            None => return self.output_unsupported(out, operation),
        };
        let mut args = vec!["ctx".to_owned()];
        args.extend(request_params(self.entity, binding, request_attributes)?);
        args.push("body".to_owned());

        self.open_method(out, operation)?;
        self.load_data(out, "Plan")?;
        out.line(&format!(
            "body, diags := r.get{}JSONRequestBody(ctx, data)",
            operation
        ))?;
        output_diagnostics_append(out, "diags")?;
        output_client_call(
            out,
            &ClientCall {
                receiver: "r",
                method,
                args,
                action: &operation.to_case(Case::Lower),
                not_found: NotFound::Fail,
                expects_body: true,
            },
        )?;
        output_diagnostics_append(out, "data.Fill(ctx, *httpResp.JSON200)")?;
        out.line("resp.Diagnostics.Append(resp.State.Set(ctx, &data)...)")?;
        out.close("}")?;
        out.blank()?;
        Ok(())
    }

    fn output_read<T: Write>(&self, out: &mut GoEmitter<T>, api: &ResourceApi) -> Result<()> {
        let mut args = vec!["ctx".to_owned()];
        args.extend(request_params(
            self.entity,
            "read_request_attributes",
            &api.read_request_attributes,
        )?);

        self.open_method(out, "Read")?;
        self.load_data(out, "State")?;
        output_client_call(
            out,
            &ClientCall {
                receiver: "r",
                method: &api.read_method,
                args,
                action: "read",
                not_found: NotFound::RemoveFromState,
                expects_body: true,
            },
        )?;
        output_diagnostics_append(out, "data.Fill(ctx, *httpResp.JSON200)")?;
        out.line("resp.Diagnostics.Append(resp.State.Set(ctx, &data)...)")?;
        out.close("}")?;
        out.blank()?;
        Ok(())
    }

    fn output_delete<T: Write>(&self, out: &mut GoEmitter<T>, api: &ResourceApi) -> Result<()> {
        let method = match &api.delete_method {
            Some(method) => method,
            None => return self.output_unsupported(out, "Delete"),
        };
        let mut args = vec!["ctx".to_owned()];
        args.extend(request_params(
            self.entity,
            "delete_request_attributes",
            &api.delete_request_attributes,
        )?);

        self.open_method(out, "Delete")?;
        self.load_data(out, "State")?;
        output_client_call(
            out,
            &ClientCall {
                receiver: "r",
                method,
                args,
                action: "delete",
                not_found: NotFound::Ignore,
                expects_body: false,
            },
        )?;
        out.close("}")?;
        out.blank()?;
        Ok(())
    }

    fn output_import_state<T: Write>(
        &self,
        out: &mut GoEmitter<T>,
        keys: &[&Attribute],
    ) -> Result<()> {
        out.open(&format!(
            "func (r *{}) ImportState(ctx context.Context, req resource.ImportStateRequest, resp *resource.ImportStateResponse) {{",
            self.type_name
        ))?;
        match keys {
            [key] => {
                out.line(&format!(
                    "resource.ImportStatePassthroughID(ctx, path.Root({}), req, resp)",
                    go_string(&key.name)
                ))?;
            }
            [first, second] => {
                let (first_var, second_var) = (
                    first.name.to_case(Case::Camel),
                    second.name.to_case(Case::Camel),
                );
                out.line(&format!(
                    "{}, {}, err := SplitTwoPartId(req.ID, {}, {})",
                    first_var,
                    second_var,
                    go_string(&first.name),
                    go_string(&second.name)
                ))?;
                out.open("if err != nil {")?;
                out.line("resp.Diagnostics.AddError(\"Invalid ID\", fmt.Sprintf(\"Error parsing ID: %s\", err.Error()))")?;
                out.line("return")?;
                out.close("}")?;
                out.blank()?;
                for (key, var) in [(first, first_var), (second, second_var)].iter() {
                    out.line(&format!(
                        "resp.Diagnostics.Append(resp.State.SetAttribute(ctx, path.Root({}), {})...)",
                        go_string(&key.name),
                        var
                    ))?;
                }
            }
            _ => {
                return Err(Error::InvalidImportKey {
                    entity: self.entity.label(),
                    count: keys.len(),
                })
            }
        }
        out.close("}")?;
        out.blank()?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::descriptor::{Catalog, Requiredness};
    use crate::test_utils::{
        attribute, nested, paginated_data_source, required, resource, simple_data_source,
    };

    fn config() -> CodeGeneratorConfig {
        CodeGeneratorConfig::default()
    }

    fn user_attributes() -> Vec<Attribute> {
        vec![
            attribute("id", AttributeKind::String),
            attribute("email", AttributeKind::String),
            attribute("added_at", AttributeKind::Int),
        ]
    }

    #[test]
    fn test_strategy_selection() {
        let simple = simple_data_source("user", "User", user_attributes());
        let paginated = paginated_data_source("users", "User", vec![nested("users", user_attributes())]);
        let managed = resource("group", "Group", user_attributes());

        assert!(matches!(Strategy::of(Entity::DataSource(&simple)), Strategy::Simple(_)));
        assert!(matches!(
            Strategy::of(Entity::DataSource(&paginated)),
            Strategy::Paginate(_)
        ));
        assert!(matches!(Strategy::of(Entity::Resource(&managed)), Strategy::Crud(_)));
    }

    #[test]
    fn test_simple_data_source() {
        let mut attributes = user_attributes();
        attributes[0].requiredness = Requiredness::Required;
        let data_source = simple_data_source("user", "User", attributes);

        let file = generate(Entity::DataSource(&data_source), &config()).unwrap();

        assert_eq!(file.file_name, "data_source_user.go");
        let code = file.code;
        assert!(code.starts_with("// Code generated by providergen. DO NOT EDIT."));
        assert!(code.contains("var _ datasource.DataSource = &UserDataSource{}"));
        assert!(code.contains(
            "// UserDataSource implements data source \"user\".\n//\n// Retrieves a user.\ntype UserDataSource struct {\n\tbaseDataSource\n}\n"
        ));
        assert!(code.contains("resp.TypeName = req.ProviderTypeName + \"_user\""));
        assert!(code.contains(
            "\thttpResp, err := d.client.RetrieveUserWithResponse(ctx, data.Id.ValueString())\n"
        ));
        assert!(code.contains("\tresp.Diagnostics.Append(data.Fill(ctx, *httpResp.JSON200)...)\n"));
        assert!(code.contains(
            "func (m *UserDataSourceModel) Fill(ctx context.Context, data apiclient.User) diag.Diagnostics {\n"
        ));
        assert!(code.contains("\tm.AddedAt = supertypes.NewInt64Value(int64(data.AddedAt))\n"));
        assert!(code.contains("\tAddedAt supertypes.Int64Value `tfsdk:\"added_at\"`\n"));
    }

    #[test]
    fn test_paginated_data_source_loop() {
        let mut data_source = paginated_data_source(
            "project_rate_limits",
            "ProjectRateLimit",
            vec![
                required("project_id", AttributeKind::String),
                nested("rate_limits", vec![attribute("model", AttributeKind::String)]),
            ],
        );
        if let DataSourceApi::Paginate(api) = &mut data_source.api {
            api.read_request_attributes = vec!["project_id".to_owned()];
        }

        let code = generate(Entity::DataSource(&data_source), &config())
            .unwrap()
            .code;

        assert!(code.contains("\tvar modelInstances []apiclient.ProjectRateLimit\n"));
        assert!(code.contains("\tparams := &apiclient.ListProjectRateLimitsParams{\n\t\tLimit: ptr.Ptr(int64(100)),\n\t}\n"));
        assert!(code.contains(
            "\t\thttpResp, err := d.client.ListProjectRateLimitsWithResponse(ctx, data.ProjectId.ValueString(), params)\n"
        ));
        assert!(code.contains(
            "\t\tif len(httpResp.JSON200.Data) == 0 {\n\t\t\tbreak done\n\t\t}\n\t\tmodelInstances = append(modelInstances, httpResp.JSON200.Data...)\n"
        ));
        assert!(code.contains("\t\tcase *bool:\n\t\t\tif v == nil || !*v {\n\t\t\t\tbreak done\n"));
        assert!(code.contains("\t\tcase string:\n\t\t\tparams.After = &v\n"));
        assert!(code.contains(
            "\t\t\tparams.After = v\n\t\t}\n\t}\n\n\tresp.Diagnostics.Append(data.Fill(ctx, modelInstances)...)\n"
        ));
        assert!(code.contains("\tresp.Diagnostics.Append(resp.State.Set(ctx, &data)...)\n}\n\ntype ProjectRateLimitsDataSourceModel struct {\n"));
        assert!(code.contains(
            "\n}\n\nfunc (m *ProjectRateLimitsDataSourceModel) Fill(ctx context.Context, data []apiclient.ProjectRateLimit) diag.Diagnostics {\n\tif data == nil {\n"
        ));
        assert!(code.contains(
            "\t\tm.RateLimits = supertypes.NewSetNestedObjectValueOfValueSlice(ctx, items)\n"
        ));
        assert!(!code.contains("remaining :="));
    }

    #[test]
    fn test_paginated_limit_and_hooks() {
        let mut data_source = paginated_data_source(
            "projects",
            "Project",
            vec![
                attribute("include_archived", AttributeKind::Bool),
                attribute("limit", AttributeKind::Int),
                nested("projects", vec![attribute("id", AttributeKind::String)]),
            ],
        );
        if let DataSourceApi::Paginate(api) = &mut data_source.api {
            api.limit_attribute = Some("limit".to_owned());
            api.hooks.read_init_loop =
                Some("\n    params.IncludeArchived = data.IncludeArchived.ValueBoolPointer()\n  ".to_owned());
        }

        let code = generate(Entity::DataSource(&data_source), &config())
            .unwrap()
            .code;

        assert!(code.contains(
            "\tparams.IncludeArchived = data.IncludeArchived.ValueBoolPointer()\n\n\tdone:\n\tfor {\n\t\tif !data.Limit.IsNull() {\n"
        ));
        assert!(code.contains("\t\t\tremaining := data.Limit.ValueInt64() - int64(len(modelInstances))\n"));
        assert!(code.contains("\t\t\tmodelInstances = modelInstances[:data.Limit.ValueInt64()]\n"));
    }

    #[test]
    fn test_results_attribute_must_be_unambiguous() {
        let data_source = paginated_data_source(
            "things",
            "Thing",
            vec![
                nested("a", vec![attribute("id", AttributeKind::String)]),
                nested("b", vec![attribute("id", AttributeKind::String)]),
            ],
        );

        assert!(matches!(
            generate(Entity::DataSource(&data_source), &config()),
            Err(Error::InvalidResultsAttribute { .. })
        ));
    }

    #[test]
    fn test_zero_page_size_is_rejected() {
        let mut data_source = paginated_data_source(
            "things",
            "Thing",
            vec![nested("things", vec![attribute("id", AttributeKind::String)])],
        );
        if let DataSourceApi::Paginate(api) = &mut data_source.api {
            api.page_size = 0;
        }

        match generate(Entity::DataSource(&data_source), &config()) {
            Err(Error::InvalidPageSize { entity }) => {
                assert_eq!(entity, "data source \"things\"")
            }
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn test_limit_attribute_must_be_int() {
        let mut data_source = paginated_data_source(
            "things",
            "Thing",
            vec![
                attribute("limit", AttributeKind::String),
                nested("things", vec![attribute("id", AttributeKind::String)]),
            ],
        );
        if let DataSourceApi::Paginate(api) = &mut data_source.api {
            api.limit_attribute = Some("limit".to_owned());
        }

        assert!(matches!(
            generate(Entity::DataSource(&data_source), &config()),
            Err(Error::InvalidLimitAttribute { .. })
        ));
    }

    #[test]
    fn test_unknown_request_attribute_is_reported() {
        let mut data_source = simple_data_source("user", "User", user_attributes());
        if let DataSourceApi::Simple(api) = &mut data_source.api {
            api.read_request_attributes = vec!["user_id".to_owned()];
        }

        match generate(Entity::DataSource(&data_source), &config()) {
            Err(Error::UnknownAttribute {
                entity,
                attribute,
                binding,
            }) => {
                assert_eq!(entity, "data source \"user\"");
                assert_eq!(attribute, "user_id");
                assert_eq!(binding, "read_request_attributes");
            }
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn test_collection_request_attribute_is_rejected() {
        let mut managed = resource("group", "Group", user_attributes());
        managed
            .attributes
            .push(nested("members", vec![attribute("id", AttributeKind::String)]));
        managed.api.create_request_attributes = vec!["members".to_owned()];

        assert!(matches!(
            generate(Entity::Resource(&managed), &config()),
            Err(Error::NonScalarBinding { attribute, .. }) if attribute == "members"
        ));
    }

    #[test]
    fn test_resource_lifecycle() {
        let managed = resource("group", "Group", user_attributes());

        let file = generate(Entity::Resource(&managed), &config()).unwrap();

        assert_eq!(file.file_name, "resource_group.go");
        let code = file.code;
        for operation in ["Create", "Read", "Update", "Delete"].iter() {
            assert!(code.contains(&format!(
                "func (r *GroupResource) {0}(ctx context.Context, req resource.{0}Request, resp *resource.{0}Response) {{\n",
                operation
            )));
        }
        assert!(code.contains("\tbody, diags := r.getCreateJSONRequestBody(ctx, data)\n"));
        assert!(code.contains("\thttpResp, err := r.client.CreateGroupWithResponse(ctx, body)\n"));
        assert!(code.contains(
            "\thttpResp, err := r.client.UpdateGroupWithResponse(ctx, data.Id.ValueString(), body)\n"
        ));
        assert!(code.contains("\t\tresp.State.RemoveResource(ctx)\n"));
        assert!(code.contains(
            "\t} else if httpResp.StatusCode() != http.StatusOK && httpResp.StatusCode() != http.StatusNoContent {\n"
        ));
        assert!(code.contains("var _ resource.ResourceWithImportState = &GroupResource{}"));
        assert!(code.contains("\tresource.ImportStatePassthroughID(ctx, path.Root(\"id\"), req, resp)\n"));
    }

    #[test]
    fn test_missing_update_and_delete_emit_stubs() {
        let mut managed = resource("user_role", "User", user_attributes());
        managed.api.update_method = None;
        managed.api.delete_method = None;

        let code = generate(Entity::Resource(&managed), &config())
            .unwrap()
            .code;

        assert!(code.contains(
            "func (r *UserRoleResource) Update(ctx context.Context, req resource.UpdateRequest, resp *resource.UpdateResponse) {\n\tresp.Diagnostics.AddError(\"Not Supported\", \"Update is not supported for resource \\\"user_role\\\".\")\n}\n"
        ));
        assert!(code.contains(
            "\tresp.Diagnostics.AddError(\"Not Supported\", \"Delete is not supported for resource \\\"user_role\\\".\")\n"
        ));
    }

    #[test]
    fn test_two_part_import_key() {
        let mut managed = resource(
            "project_user",
            "ProjectUser",
            vec![
                required("project_id", AttributeKind::String),
                required("user_id", AttributeKind::String),
                attribute("id", AttributeKind::String),
            ],
        );
        managed.import_key_attributes = vec!["project_id".to_owned(), "user_id".to_owned()];

        let code = generate(Entity::Resource(&managed), &config())
            .unwrap()
            .code;

        assert!(code.contains(
            "\tprojectId, userId, err := SplitTwoPartId(req.ID, \"project_id\", \"user_id\")\n"
        ));
        assert!(code.contains(
            "\tresp.Diagnostics.Append(resp.State.SetAttribute(ctx, path.Root(\"user_id\"), userId)...)\n"
        ));
    }

    #[test]
    fn test_too_many_import_keys() {
        let mut managed = resource("group", "Group", user_attributes());
        managed.import_key_attributes = vec!["id".into(), "email".into(), "added_at".into()];

        assert!(matches!(
            generate(Entity::Resource(&managed), &config()),
            Err(Error::InvalidImportKey { count: 3, .. })
        ));
    }

    #[test]
    fn test_builtin_catalog_generates() {
        let catalog = Catalog::builtin().unwrap();
        for entity in catalog.entities() {
            let first = generate(entity, &config()).unwrap();
            let second = generate(entity, &config()).unwrap();
            assert_eq!(first, second);
        }
    }
}
