//! Per-attribute translation into Go source fragments.
//!
//! Every translator matches exhaustively over [`AttributeKind`], so a new kind
//! does not compile until each of them knows how to render it.

use crate::descriptor::{Attribute, AttributeKind, Primitive, Requiredness};
use crate::error::{Error, Result};
use convert_case::{Case, Casing};

/// `snake_case` descriptor name to the exported Go identifier.
pub fn camelize(name: &str) -> String {
    name.to_case(Case::Pascal)
}

/// Name of the Go struct backing the items of a nested attribute.
///
/// Schema, value type, model and fill code all derive the name here, so the
/// references agree byte for byte.
pub fn synthetic_type_name(parent: &str, attribute: &Attribute) -> String {
    format!("{}{}Item", parent, camelize(&attribute.name))
}

/// Quote `text` as a Go interpreted string literal.
pub(crate) fn go_string(text: &str) -> String {
    serde_json::Value::String(text.to_owned()).to_string()
}

fn requiredness_directive(requiredness: Requiredness) -> &'static str {
    match requiredness {
        Requiredness::Required => "Required: true,",
        Requiredness::Computed => "Computed: true,",
        Requiredness::Optional => "Optional: true,",
        Requiredness::ComputedOptional => "Optional: true,\nComputed: true,",
    }
}

fn go_primitive(element: Primitive) -> &'static str {
    match element {
        Primitive::String => "string",
        Primitive::Int => "int64",
        Primitive::Bool => "bool",
    }
}

fn framework_element_type(element: Primitive) -> &'static str {
    match element {
        Primitive::String => "types.StringType",
        Primitive::Int => "types.Int64Type",
        Primitive::Bool => "types.BoolType",
    }
}

fn block(open: &str, body: &str, close: &str) -> String {
    let mut out = String::with_capacity(open.len() + body.len() + close.len() + 2);
    out.push_str(open);
    out.push('\n');
    let indented = textwrap::indent(body, "\t");
    out.push_str(&indented);
    if !indented.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(close);
    out
}

fn annotation_list(
    field: &str,
    package: &str,
    framework_type: &str,
    items: &[String],
) -> Option<String> {
    if items.is_empty() {
        return None;
    }
    let body = items
        .iter()
        .map(|item| format!("{},", item.trim()))
        .collect::<Vec<_>>()
        .join("\n");
    Some(block(
        &format!("{}: []{}.{}{{", field, package, framework_type),
        &body,
        "},",
    ))
}

/// The `Attributes: map[string]schema.Attribute{...}` block for nested kinds.
pub fn schema_attributes(attributes: &[Attribute], parent: &str) -> String {
    let body = attributes
        .iter()
        .map(|attribute| {
            format!(
                "{}: {},",
                go_string(&attribute.name),
                schema_fragment(attribute, parent)
            )
        })
        .collect::<Vec<_>>()
        .join("\n");
    block("Attributes: map[string]schema.Attribute{", &body, "},")
}

/// Go `schema.*Attribute{...}` literal declaring `attribute`.
pub fn schema_fragment(attribute: &Attribute, parent: &str) -> String {
    let mut lines = vec![
        format!("MarkdownDescription: {},", go_string(&attribute.description)),
        requiredness_directive(attribute.requiredness).to_owned(),
    ];
    if attribute.sensitive {
        lines.push("Sensitive: true,".to_owned());
    }

    let (constructor, framework_type) = match &attribute.kind {
        AttributeKind::String => {
            lines.push("CustomType: supertypes.StringType{},".to_owned());
            ("schema.StringAttribute", "String")
        }
        AttributeKind::Int => {
            lines.push("CustomType: supertypes.Int64Type{},".to_owned());
            ("schema.Int64Attribute", "Int64")
        }
        AttributeKind::Bool => {
            lines.push("CustomType: supertypes.BoolType{},".to_owned());
            ("schema.BoolAttribute", "Bool")
        }
        AttributeKind::SetOfPrimitive { element } => {
            lines.push(format!("ElementType: {},", framework_element_type(*element)));
            lines.push(format!(
                "CustomType: supertypes.NewSetTypeOf[{}](ctx),",
                go_primitive(*element)
            ));
            ("schema.SetAttribute", "Set")
        }
        AttributeKind::SetNested { attributes } => {
            let item = synthetic_type_name(parent, attribute);
            lines.push(format!(
                "CustomType: supertypes.NewSetNestedObjectTypeOf[{}](ctx),",
                item
            ));
            lines.push(block(
                "NestedObject: schema.NestedAttributeObject{",
                &schema_attributes(attributes, &item),
                "},",
            ));
            ("schema.SetNestedAttribute", "Set")
        }
        AttributeKind::Object { attributes } => {
            let item = synthetic_type_name(parent, attribute);
            lines.push(format!(
                "CustomType: supertypes.NewSingleNestedObjectTypeOf[{}](ctx),",
                item
            ));
            lines.push(schema_attributes(attributes, &item));
            ("schema.SingleNestedAttribute", "Object")
        }
    };

    lines.extend(annotation_list(
        "Validators",
        "validator",
        framework_type,
        &attribute.validators,
    ));
    lines.extend(annotation_list(
        "PlanModifiers",
        "planmodifier",
        framework_type,
        &attribute.plan_modifiers,
    ));

    block(&format!("{}{{", constructor), &lines.join("\n"), "}")
}

/// Go type of the model field holding `attribute`.
pub fn value_type(attribute: &Attribute, parent: &str) -> String {
    match &attribute.kind {
        AttributeKind::String => "supertypes.StringValue".to_owned(),
        AttributeKind::Int => "supertypes.Int64Value".to_owned(),
        AttributeKind::Bool => "supertypes.BoolValue".to_owned(),
        AttributeKind::SetOfPrimitive { element } => {
            format!("supertypes.SetValueOf[{}]", go_primitive(*element))
        }
        AttributeKind::SetNested { .. } => format!(
            "supertypes.SetNestedObjectValueOf[{}]",
            synthetic_type_name(parent, attribute)
        ),
        AttributeKind::Object { .. } => format!(
            "supertypes.SingleNestedObjectValueOf[{}]",
            synthetic_type_name(parent, attribute)
        ),
    }
}

/// Expression reading the primitive out of `source_var`'s field.
///
/// Nullable attributes read through the pointer accessors, mirroring the
/// pointer sources accepted by [`from_primitive_stmt`].
pub fn to_primitive_expr(attribute: &Attribute, source_var: &str) -> Result<String> {
    let field = format!("{}.{}", source_var, camelize(&attribute.name));
    let accessor = match (&attribute.kind, attribute.nullable) {
        (AttributeKind::String, false) => "ValueString()",
        (AttributeKind::String, true) => "ValueStringPointer()",
        (AttributeKind::Int, false) => "ValueInt64()",
        (AttributeKind::Int, true) => "ValueInt64Pointer()",
        (AttributeKind::Bool, false) => "ValueBool()",
        (AttributeKind::Bool, true) => "ValueBoolPointer()",
        (AttributeKind::SetOfPrimitive { .. }, _)
        | (AttributeKind::SetNested { .. }, _)
        | (AttributeKind::Object { .. }, _) => {
            return Err(Error::NotScalar {
                attribute: attribute.name.clone(),
                kind: attribute.kind.tag(),
            })
        }
    };
    Ok(format!("{}.{}", field, accessor))
}

/// Statement storing `source_var`'s field into `dest_var`'s field.
pub fn from_primitive_stmt(
    attribute: &Attribute,
    parent: &str,
    source_var: &str,
    dest_var: &str,
) -> String {
    let field = camelize(&attribute.name);
    assign_value(
        attribute,
        parent,
        &format!("{}.{}", source_var, field),
        &format!("{}.{}", dest_var, field),
        0,
    )
}

fn nullable_branches(src: &str, present: &str, absent: &str) -> String {
    format!(
        "if {} != nil {{\n\t{}\n}} else {{\n\t{}\n}}",
        src, present, absent
    )
}

fn scalar_assign(
    nullable: bool,
    src: &str,
    dest: &str,
    wrapper: &str,
    convert: fn(&str) -> String,
) -> String {
    if nullable {
        nullable_branches(
            src,
            &format!(
                "{} = supertypes.New{}Value({})",
                dest,
                wrapper,
                convert(&format!("*{}", src))
            ),
            &format!("{} = supertypes.New{}Null()", dest, wrapper),
        )
    } else {
        format!(
            "{} = supertypes.New{}Value({})",
            dest,
            wrapper,
            convert(src)
        )
    }
}

/// Like [`from_primitive_stmt`] but over full source and destination
/// expressions. `depth` keeps loop variables of nested collections distinct.
pub(crate) fn assign_value(
    attribute: &Attribute,
    parent: &str,
    src: &str,
    dest: &str,
    depth: usize,
) -> String {
    match &attribute.kind {
        AttributeKind::String => scalar_assign(attribute.nullable, src, dest, "String", |v| {
            format!("string({})", v)
        }),
        AttributeKind::Int => scalar_assign(attribute.nullable, src, dest, "Int64", |v| {
            format!("int64({})", v)
        }),
        AttributeKind::Bool => {
            scalar_assign(attribute.nullable, src, dest, "Bool", |v| v.to_owned())
        }
        AttributeKind::SetOfPrimitive { element } => {
            if attribute.nullable {
                nullable_branches(
                    src,
                    &format!("{} = supertypes.NewSetValueOfSlice(ctx, *{})", dest, src),
                    &format!(
                        "{} = supertypes.NewSetValueOfNull[{}](ctx)",
                        dest,
                        go_primitive(*element)
                    ),
                )
            } else {
                format!("{} = supertypes.NewSetValueOfSlice(ctx, {})", dest, src)
            }
        }
        AttributeKind::SetNested { attributes } => {
            let item_type = synthetic_type_name(parent, attribute);
            let suffix = depth_suffix(depth);
            let items = format!("items{}", suffix);
            let slice = if attribute.nullable {
                format!("*{}", src)
            } else {
                src.to_owned()
            };

            let mut body = format!("{} := make([]{}, len({}))\n", items, item_type, slice);
            if !attributes.is_empty() {
                let index = format!("i{}", suffix);
                let item = format!("item{}", suffix);
                let fills = attributes
                    .iter()
                    .map(|child| {
                        let field = camelize(&child.name);
                        assign_value(
                            child,
                            &item_type,
                            &format!("{}.{}", item, field),
                            &format!("{}[{}].{}", items, index, field),
                            depth + 1,
                        )
                    })
                    .collect::<Vec<_>>()
                    .join("\n");
                body.push_str(&block(
                    &format!("for {}, {} := range {} {{", index, item, slice),
                    &fills,
                    "}",
                ));
                body.push('\n');
            }
            body.push_str(&format!(
                "{} = supertypes.NewSetNestedObjectValueOfValueSlice(ctx, {})",
                dest, items
            ));

            block(
                &format!("if {} == nil {{", src),
                &format!(
                    "{} = supertypes.NewSetNestedObjectValueOfNull[{}](ctx)",
                    dest, item_type
                ),
                &block("} else {", &body, "}"),
            )
        }
        AttributeKind::Object { attributes } => {
            let item_type = synthetic_type_name(parent, attribute);
            let object = format!("obj{}", depth_suffix(depth));
            let mut body = vec![format!("var {} {}", object, item_type)];
            body.extend(attributes.iter().map(|child| {
                let field = camelize(&child.name);
                assign_value(
                    child,
                    &item_type,
                    &format!("{}.{}", src, field),
                    &format!("{}.{}", object, field),
                    depth + 1,
                )
            }));
            body.push(format!(
                "{} = supertypes.NewSingleNestedObjectValueOf(ctx, &{})",
                dest, object
            ));
            let body = body.join("\n");

            if attribute.nullable {
                block(
                    &format!("if {} == nil {{", src),
                    &format!(
                        "{} = supertypes.NewSingleNestedObjectValueOfNull[{}](ctx)",
                        dest, item_type
                    ),
                    &block("} else {", &body, "}"),
                )
            } else {
                block("{", &body, "}")
            }
        }
    }
}

fn depth_suffix(depth: usize) -> String {
    if depth == 0 {
        String::new()
    } else {
        depth.to_string()
    }
}
