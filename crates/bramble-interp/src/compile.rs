use std::collections::HashMap;

use tracing::debug;

use bramble_meta::{
    normalize_spaces, split_top_level_comma, strip_namespaces, template_of, ElementDescriptor,
    ElementRole, MetadataMap, POLYMORPHIC_BASE_TAG,
};

use crate::error::{InterpError, InterpResult};
use crate::plan::{Member, Plan, PlanArena, PlanId, PrimKind};

/// A finished plan graph: the arena plus its root node.
#[derive(Debug)]
pub struct CompiledPlan {
    arena: PlanArena,
    root: PlanId,
}

impl CompiledPlan {
    /// Compile the plan for one element descriptor.
    pub fn for_element(element: &ElementDescriptor, metadata: &MetadataMap) -> InterpResult<Self> {
        let mut compiler = Compiler {
            metadata,
            arena: PlanArena::new(),
            class_cache: HashMap::new(),
            path: Vec::new(),
        };
        let root = compiler.compile_element(element, false)?;
        debug!(
            root_type = %element.type_name,
            nodes = compiler.arena.len(),
            "compiled reader plan"
        );
        Ok(Self {
            arena: compiler.arena,
            root,
        })
    }

    /// Compile the plan for a whole class, as used for one branch of
    /// user-defined record type.
    pub fn for_class(class: &str, metadata: &MetadataMap) -> InterpResult<Self> {
        Self::for_element(&ElementDescriptor::value(class, class), metadata)
    }

    pub fn arena(&self) -> &PlanArena {
        &self.arena
    }

    pub fn root(&self) -> PlanId {
        self.root
    }
}

struct Compiler<'a> {
    metadata: &'a MetadataMap,
    arena: PlanArena,
    class_cache: HashMap<String, PlanId>,
    path: Vec<String>,
}

impl Compiler<'_> {
    /// Ordered matcher rules, highest priority first; the first rule that
    /// recognizes the element wins, and a rule declines by returning
    /// `Ok(None)`.
    fn compile_element(
        &mut self,
        element: &ElementDescriptor,
        nested: bool,
    ) -> InterpResult<PlanId> {
        self.path.push(element.name.clone());
        let result = self.dispatch(element, nested);
        let id = result?;
        self.path.pop();
        Ok(id)
    }

    fn dispatch(&mut self, element: &ElementDescriptor, nested: bool) -> InterpResult<PlanId> {
        if let Some(id) = self.rule_fixed_c_array(element, nested)? {
            return Ok(id);
        }

        let name = normalize_spaces(strip_namespaces(element.type_name.trim()));

        if let Some(id) = self.rule_primitive(&name)? {
            return Ok(id);
        }
        if let Some(id) = self.rule_sequence(element, &name, nested)? {
            return Ok(id);
        }
        if let Some(id) = self.rule_assoc_map(element, &name, nested)? {
            return Ok(id);
        }
        if let Some(id) = self.rule_string_or_num_array(&name, nested)? {
            return Ok(id);
        }
        if let Some(id) = self.rule_legacy_terminal(element, &name)? {
            return Ok(id);
        }
        if let Some(id) = self.rule_base(element)? {
            return Ok(id);
        }
        if let Some(id) = self.rule_object_header(&name)? {
            return Ok(id);
        }

        Err(InterpError::NoRule {
            type_name: element.type_name.clone(),
            path: self.dotted_path(),
        })
    }

    /// Rule 1: one or more declared array dimensions always wins, whatever
    /// the item type would otherwise match.
    fn rule_fixed_c_array(
        &mut self,
        element: &ElementDescriptor,
        nested: bool,
    ) -> InterpResult<Option<PlanId>> {
        if element.array_dims == 0 {
            return Ok(None);
        }
        let dims: Vec<u32> = element
            .max_index
            .iter()
            .take(element.array_dims as usize)
            .copied()
            .collect();
        let flat: u32 = dims.iter().product();
        if dims.len() < element.array_dims as usize || flat == 0 {
            return Err(InterpError::EmptyArray {
                type_name: element.type_name.clone(),
                path: self.dotted_path(),
            });
        }
        let item = self.compile_element(&element.without_dims(), nested)?;
        let item_has_header = self.arena.get(item).is_header_bearing();
        Ok(Some(self.arena.push(Plan::FixedCArray {
            item,
            flat,
            dims,
            item_has_header,
        })))
    }

    /// Rule 2: scalar numeric names, including the format's legacy aliases.
    fn rule_primitive(&mut self, name: &str) -> InterpResult<Option<PlanId>> {
        Ok(primitive_kind(name).map(|kind| self.arena.push(Plan::Primitive(kind))))
    }

    /// Rule 3: dynamic sequences.
    fn rule_sequence(
        &mut self,
        element: &ElementDescriptor,
        name: &str,
        nested: bool,
    ) -> InterpResult<Option<PlanId>> {
        let Some((head, args)) = template_of(name) else {
            return Ok(None);
        };
        if head != "vector" && head != "array" {
            return Ok(None);
        }
        // array<T, N> carries its extent after the comma; the item type is
        // the first argument either way.
        let item_name = match split_top_level_comma(args) {
            Some((first, _)) => first,
            None => args,
        };
        let item_elem = ElementDescriptor::value(&element.name, item_name);
        let item = self.compile_element(&item_elem, true)?;
        Ok(Some(self.arena.push(Plan::Sequence {
            item,
            top_level: !nested,
        })))
    }

    /// Rule 4: associative containers, keys and values split at the first
    /// top-level comma.
    fn rule_assoc_map(
        &mut self,
        element: &ElementDescriptor,
        name: &str,
        nested: bool,
    ) -> InterpResult<Option<PlanId>> {
        let Some((head, args)) = template_of(name) else {
            return Ok(None);
        };
        if head != "map" && head != "unordered_map" && head != "multimap" {
            return Ok(None);
        }
        let Some((key_name, value_name)) = split_top_level_comma(args) else {
            return Err(InterpError::NoRule {
                type_name: element.type_name.clone(),
                path: self.dotted_path(),
            });
        };
        let key = self.compile_element(&ElementDescriptor::value("key", key_name), true)?;
        let value = self.compile_element(&ElementDescriptor::value("value", value_name), true)?;
        Ok(Some(self.arena.push(Plan::AssocMap {
            key,
            value,
            top_level: !nested,
        })))
    }

    /// Rule 5: dynamic strings and the legacy fixed-width numeric array
    /// containers.
    fn rule_string_or_num_array(&mut self, name: &str, nested: bool) -> InterpResult<Option<PlanId>> {
        if name == "string" {
            return Ok(Some(self.arena.push(Plan::DynString {
                top_level: !nested,
            })));
        }
        let kind = match name {
            "TArrayC" => Some(PrimKind::I8),
            "TArrayS" => Some(PrimKind::I16),
            "TArrayI" => Some(PrimKind::I32),
            "TArrayL" | "TArrayL64" => Some(PrimKind::I64),
            "TArrayF" => Some(PrimKind::F32),
            "TArrayD" => Some(PrimKind::F64),
            _ => None,
        };
        Ok(kind.map(|kind| self.arena.push(Plan::FixedNumArray(kind))))
    }

    /// Rule 6: the legacy fixed string type and the no-payload marker role.
    fn rule_legacy_terminal(
        &mut self,
        element: &ElementDescriptor,
        name: &str,
    ) -> InterpResult<Option<PlanId>> {
        if name == "TString" {
            return Ok(Some(self.arena.push(Plan::FixedString)));
        }
        if element.role == ElementRole::Artificial {
            return Ok(Some(self.arena.push(Plan::Empty)));
        }
        Ok(None)
    }

    /// Rule 7: base-class chain entries.
    fn rule_base(&mut self, element: &ElementDescriptor) -> InterpResult<Option<PlanId>> {
        let ElementRole::Base { tag } = element.role else {
            return Ok(None);
        };
        if tag == POLYMORPHIC_BASE_TAG {
            return Ok(Some(self.arena.push(Plan::PolyBaseMarker)));
        }
        let class = strip_namespaces(element.type_name.trim()).to_string();
        let cache_key = format!("base:{class}");
        if let Some(&id) = self.class_cache.get(&cache_key) {
            return Ok(Some(id));
        }
        let id = self.arena.reserve();
        self.class_cache.insert(cache_key, id);
        let members = self.compile_members(&class)?;
        self.arena.set(id, Plan::BaseObject { class, members });
        Ok(Some(id))
    }

    /// Rule 8, lowest priority: a whole object of a class the metadata
    /// knows. Declines (rather than failing) when the class is unknown so
    /// the caller can report a no-rule error naming the type.
    fn rule_object_header(&mut self, name: &str) -> InterpResult<Option<PlanId>> {
        if !self.metadata.contains(name) {
            return Ok(None);
        }
        let cache_key = format!("obj:{name}");
        if let Some(&id) = self.class_cache.get(&cache_key) {
            return Ok(Some(id));
        }
        let id = self.arena.reserve();
        self.class_cache.insert(cache_key, id);
        let members = self.compile_members(name)?;
        self.arena.set(
            id,
            Plan::ObjectHeader {
                class: name.to_string(),
                members,
            },
        );
        Ok(Some(id))
    }

    fn compile_members(&mut self, class: &str) -> InterpResult<Vec<Member>> {
        let elements = self
            .metadata
            .elements_of(class)
            .ok_or_else(|| InterpError::UnknownClass {
                class: class.to_string(),
                path: self.dotted_path(),
            })?
            .to_vec();
        elements
            .iter()
            .map(|elem| {
                Ok(Member {
                    name: elem.name.clone(),
                    plan: self.compile_element(elem, false)?,
                })
            })
            .collect()
    }

    fn dotted_path(&self) -> String {
        self.path.join(".")
    }
}

fn primitive_kind(name: &str) -> Option<PrimKind> {
    match name {
        "bool" | "Bool_t" => Some(PrimKind::Bool),
        "char" | "signed char" | "Char_t" | "int8_t" => Some(PrimKind::I8),
        "unsigned char" | "UChar_t" | "uint8_t" => Some(PrimKind::U8),
        "short" | "Short_t" | "int16_t" => Some(PrimKind::I16),
        "unsigned short" | "UShort_t" | "uint16_t" => Some(PrimKind::U16),
        "int" | "Int_t" | "int32_t" => Some(PrimKind::I32),
        "unsigned int" | "UInt_t" | "uint32_t" => Some(PrimKind::U32),
        "long" | "long long" | "Long_t" | "Long64_t" | "int64_t" => Some(PrimKind::I64),
        "unsigned long" | "unsigned long long" | "ULong_t" | "ULong64_t" | "uint64_t" => {
            Some(PrimKind::U64)
        }
        "float" | "Float_t" => Some(PrimKind::F32),
        "double" | "Double_t" => Some(PrimKind::F64),
        _ => None,
    }
}
