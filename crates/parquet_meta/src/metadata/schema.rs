//! Conversion between the flat wire schema and the nested type tree.
//!
//! The wire schema is a depth-first pre-order list of elements where each
//! group element declares how many of the following elements are its direct
//! children.

use std::fmt;
use std::sync::Arc;

use hashbrown::HashMap;
use parquet_meta_error::{MetaError, Result};

use crate::thrift_gen::{self, SchemaElement};
use crate::types::{
    ConvertedType,
    GroupType,
    ParquetType,
    PhysicalType,
    PrimitiveType,
    Repetition,
    TypeInfo,
};

/// Groups nested deeper than this are rejected.
const MAX_SCHEMA_DEPTH: usize = 256;

/// Path from the schema root (exclusive) to a leaf column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColumnPath(Vec<Arc<str>>);

impl ColumnPath {
    pub fn new(parts: Vec<Arc<str>>) -> Self {
        ColumnPath(parts)
    }

    pub fn parts(&self) -> &[Arc<str>] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: AsRef<str>> From<&[S]> for ColumnPath {
    fn from(parts: &[S]) -> Self {
        ColumnPath(parts.iter().map(|p| Arc::from(p.as_ref())).collect())
    }
}

impl fmt::Display for ColumnPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, part) in self.0.iter().enumerate() {
            if idx > 0 {
                write!(f, ".")?;
            }
            write!(f, "{part}")?;
        }
        Ok(())
    }
}

/// Schema of a parquet file.
#[derive(Debug, Clone)]
pub struct Schema {
    /// The root group, its fields are the top-level columns.
    root: GroupType,
    /// Leaf columns in pre-order.
    leaves: Vec<(ColumnPath, Arc<PrimitiveType>)>,
    leaf_lookup: HashMap<ColumnPath, usize>,
}

impl PartialEq for Schema {
    fn eq(&self, other: &Self) -> bool {
        // Leaves are derived from the root.
        self.root == other.root
    }
}

impl Eq for Schema {}

impl Schema {
    pub fn new(root: GroupType) -> Self {
        let mut leaves = Vec::new();
        let mut path = Vec::new();
        for field in &root.fields {
            collect_leaves(field, &mut path, &mut leaves);
        }

        let leaf_lookup = leaves
            .iter()
            .enumerate()
            .map(|(idx, (path, _))| (path.clone(), idx))
            .collect();

        Schema {
            root,
            leaves,
            leaf_lookup,
        }
    }

    pub fn root(&self) -> &GroupType {
        &self.root
    }

    /// Top-level fields.
    pub fn fields(&self) -> &[ParquetType] {
        &self.root.fields
    }

    /// All leaf columns with their paths, in pre-order.
    pub fn leaves(&self) -> &[(ColumnPath, Arc<PrimitiveType>)] {
        &self.leaves
    }

    /// Look up the leaf column at `path`.
    pub fn primitive_at(&self, path: &ColumnPath) -> Option<&Arc<PrimitiveType>> {
        self.leaf_lookup.get(path).map(|&idx| &self.leaves[idx].1)
    }
}

fn collect_leaves(
    typ: &ParquetType,
    path: &mut Vec<Arc<str>>,
    leaves: &mut Vec<(ColumnPath, Arc<PrimitiveType>)>,
) {
    path.push(Arc::from(typ.name()));
    match typ {
        ParquetType::Primitive(prim) => {
            leaves.push((ColumnPath::new(path.clone()), Arc::new(prim.clone())));
        }
        ParquetType::Group(group) => {
            for field in &group.fields {
                collect_leaves(field, path, leaves);
            }
        }
    }
    path.pop();
}

/// Build the schema tree from its flattened wire representation.
pub fn build_schema(elements: &[SchemaElement]) -> Result<Schema> {
    let root_elem = elements
        .first()
        .ok_or_else(|| MetaError::corrupt("empty schema"))?;

    let mut cursor = 1;
    let fields = build_children(elements, &mut cursor, num_children(root_elem)?, 1)?;

    if cursor != elements.len() {
        return Err(MetaError::corrupt(format!(
            "schema has {} elements left over after the root",
            elements.len() - cursor
        )));
    }

    Ok(Schema::new(GroupType {
        info: type_info(root_elem)?,
        fields,
    }))
}

fn num_children(elem: &SchemaElement) -> Result<usize> {
    let n = elem.num_children.unwrap_or(0);
    usize::try_from(n).map_err(|_| {
        MetaError::corrupt(format!(
            "negative child count {n} for schema element '{}'",
            elem.name
        ))
    })
}

fn build_children(
    elements: &[SchemaElement],
    cursor: &mut usize,
    count: usize,
    depth: usize,
) -> Result<Vec<ParquetType>> {
    if depth > MAX_SCHEMA_DEPTH {
        return Err(MetaError::corrupt("schema nested too deeply"));
    }

    // Every child consumes at least one element.
    let mut fields = Vec::with_capacity(count.min(elements.len() - *cursor));
    for _ in 0..count {
        let elem = elements.get(*cursor).ok_or_else(|| {
            MetaError::corrupt(format!(
                "schema element count overrun, expected at least {} elements",
                *cursor + 1
            ))
        })?;
        *cursor += 1;

        let field = match elem.type_ {
            Some(physical_type) => ParquetType::Primitive(PrimitiveType {
                info: type_info(elem)?,
                physical_type: PhysicalType::try_from(physical_type)?,
                type_length: elem.type_length,
                precision: elem.precision,
                scale: elem.scale,
            }),
            None => {
                let n = num_children(elem)?;
                ParquetType::Group(GroupType {
                    info: type_info(elem)?,
                    fields: build_children(elements, cursor, n, depth + 1)?,
                })
            }
        };
        fields.push(field);
    }

    Ok(fields)
}

fn type_info(elem: &SchemaElement) -> Result<TypeInfo> {
    Ok(TypeInfo {
        name: elem.name.to_lowercase(),
        repetition: elem.repetition_type.map(Repetition::try_from).transpose()?,
        converted_type: elem
            .converted_type
            .map(ConvertedType::try_from)
            .transpose()?,
        logical_type: elem.logical_type,
        id: elem.field_id,
    })
}

/// Flatten the schema tree back into pre-order wire elements.
pub fn flatten_schema(schema: &Schema) -> Vec<SchemaElement> {
    let mut elements = Vec::with_capacity(schema.leaves.len() + 1);
    elements.push(group_element(&schema.root));
    for field in &schema.root.fields {
        flatten_into(field, &mut elements);
    }
    elements
}

fn flatten_into(typ: &ParquetType, elements: &mut Vec<SchemaElement>) {
    match typ {
        ParquetType::Primitive(prim) => {
            let mut elem = element_with_info(&prim.info);
            elem.type_ = Some(prim.physical_type.into());
            elem.type_length = prim.type_length;
            elem.precision = prim.precision;
            elem.scale = prim.scale;
            elements.push(elem);
        }
        ParquetType::Group(group) => {
            elements.push(group_element(group));
            for field in &group.fields {
                flatten_into(field, elements);
            }
        }
    }
}

fn group_element(group: &GroupType) -> SchemaElement {
    let mut elem = element_with_info(&group.info);
    elem.num_children = Some(group.fields.len() as i32);
    elem
}

fn element_with_info(info: &TypeInfo) -> SchemaElement {
    SchemaElement {
        type_: None,
        type_length: None,
        repetition_type: info.repetition.map(thrift_gen::FieldRepetitionType::from),
        name: info.name.clone(),
        num_children: None,
        converted_type: info.converted_type.map(thrift_gen::ConvertedType::from),
        scale: None,
        precision: None,
        field_id: info.id,
        logical_type: info.logical_type,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::thrift_gen::{FieldRepetitionType, LogicalType, Type};

    fn leaf(name: &str, typ: Type) -> SchemaElement {
        SchemaElement {
            type_: Some(typ),
            repetition_type: Some(FieldRepetitionType::OPTIONAL),
            name: name.to_string(),
            ..Default::default()
        }
    }

    fn group(name: &str, num_children: i32) -> SchemaElement {
        SchemaElement {
            repetition_type: Some(FieldRepetitionType::OPTIONAL),
            name: name.to_string(),
            num_children: Some(num_children),
            ..Default::default()
        }
    }

    /// schema { a: int32, B { c: binary (utf8), d { e: int64 } }, f: decimal }
    fn nested_elements() -> Vec<SchemaElement> {
        vec![
            SchemaElement {
                name: "schema".to_string(),
                num_children: Some(3),
                ..Default::default()
            },
            leaf("a", Type::INT32),
            group("B", 2),
            SchemaElement {
                converted_type: Some(thrift_gen::ConvertedType::UTF8),
                logical_type: Some(LogicalType::String),
                ..leaf("c", Type::BYTE_ARRAY)
            },
            group("d", 1),
            leaf("E", Type::INT64),
            SchemaElement {
                type_length: Some(16),
                precision: Some(38),
                scale: Some(4),
                converted_type: Some(thrift_gen::ConvertedType::DECIMAL),
                logical_type: Some(LogicalType::Decimal {
                    scale: 4,
                    precision: 38,
                }),
                field_id: Some(12),
                ..leaf("f", Type::FIXED_LEN_BYTE_ARRAY)
            },
        ]
    }

    #[test]
    fn nested_leaves_in_preorder() {
        let schema = build_schema(&nested_elements()).unwrap();

        let paths: Vec<_> = schema.leaves().iter().map(|(p, _)| p.to_string()).collect();
        assert_eq!(vec!["a", "b.c", "b.d.e", "f"], paths);

        let e = schema
            .primitive_at(&ColumnPath::from(["b", "d", "e"].as_slice()))
            .unwrap();
        assert_eq!(PhysicalType::Int64, e.physical_type);
        assert_eq!(Some(Repetition::Optional), e.info.repetition);

        let f = schema
            .primitive_at(&ColumnPath::from(["f"].as_slice()))
            .unwrap();
        assert_eq!(Some(16), f.type_length);
        assert_eq!(Some(38), f.precision);
        assert_eq!(Some(4), f.scale);
        assert_eq!(Some(12), f.info.id);

        assert!(schema
            .primitive_at(&ColumnPath::from(["B", "c"].as_slice()))
            .is_none());
    }

    #[test]
    fn flatten_then_build_is_identity() {
        let schema = build_schema(&nested_elements()).unwrap();
        let flattened = flatten_schema(&schema);
        assert_eq!(7, flattened.len());

        let rebuilt = build_schema(&flattened).unwrap();
        assert_eq!(schema, rebuilt);
        assert_eq!(flattened, flatten_schema(&rebuilt));
    }

    #[test]
    fn root_only() {
        let schema = build_schema(&[SchemaElement {
            name: "root".to_string(),
            ..Default::default()
        }])
        .unwrap();
        assert!(schema.fields().is_empty());
        assert!(schema.leaves().is_empty());
    }

    #[test]
    fn empty_schema() {
        let err = build_schema(&[]).unwrap_err();
        assert!(err.is_corrupt());
    }

    #[test]
    fn overrun() {
        let mut elements = nested_elements();
        elements.truncate(5);
        let err = build_schema(&elements).unwrap_err();
        assert!(err.is_corrupt());
    }

    #[test]
    fn leftover_elements() {
        let mut elements = nested_elements();
        elements.push(leaf("extra", Type::INT32));
        let err = build_schema(&elements).unwrap_err();
        assert!(err.is_corrupt());
    }

    #[test]
    fn unknown_converted_type() {
        let mut elements = nested_elements();
        elements[1].converted_type = Some(thrift_gen::ConvertedType(99));
        let err = build_schema(&elements).unwrap_err();
        assert!(err.is_corrupt());
    }

    #[test]
    fn negative_child_count() {
        let err = build_schema(&[group("root", -1)]).unwrap_err();
        assert!(err.is_corrupt());
    }
}
