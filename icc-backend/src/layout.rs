//! Class layout calculation
//!
//! Every object starts with a pointer to its class's dispatch vector in word
//! 0, followed by one word per field. A subclass copies its superclass's field
//! and method slots unchanged, appends its own fields after them, and puts an
//! overriding method into the slot of the method it overrides. Slots must be
//! known for every class before any method body is lowered, since call sites
//! and field accesses refer to them by number.

use crate::error::CodegenError;
use icc_ast::{ClassDecl, MethodDecl, MethodKind, Program};
use icc_common::{Type, LIBRARY_CLASS, WORD_SIZE};
use log::debug;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// A method as seen from a call site
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MethodEntry {
    pub name: String,
    /// Class whose body provides the code for this slot
    pub declaring_class: String,
    /// Formal parameter names, used for named call arguments
    pub formals: Vec<String>,
    pub return_type: Type,
}

impl MethodEntry {
    fn from_decl(class_name: &str, method: &MethodDecl) -> Self {
        Self {
            name: method.name.clone(),
            declaring_class: class_name.to_string(),
            formals: method.formal_names(),
            return_type: method.return_type.clone(),
        }
    }

    /// Code label of a virtual method, `_<Class>_<method>`
    pub fn virtual_label(&self) -> String {
        format!("_{}_{}", self.declaring_class, self.name)
    }

    pub fn returns_void(&self) -> bool {
        self.return_type.is_void()
    }
}

/// Layout information for a single field
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldSlot {
    pub name: String,
    pub slot: usize,
}

/// Memory and dispatch layout of one class
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassLayout {
    pub name: String,
    pub superclass: Option<String>,
    /// Fields in slot order, slots start at 1
    fields: Vec<FieldSlot>,
    /// Virtual methods indexed by dispatch slot
    methods: Vec<MethodEntry>,
    static_methods: Vec<MethodEntry>,
}

impl ClassLayout {
    fn empty(name: &str) -> Self {
        Self {
            name: name.to_string(),
            superclass: None,
            fields: Vec::new(),
            methods: Vec::new(),
            static_methods: Vec::new(),
        }
    }

    /// Layout of a class without a superclass
    pub fn root(class: &ClassDecl) -> Self {
        let mut layout = Self::empty(&class.name);
        layout.add_members(class);
        layout
    }

    /// Layout of a class extending `parent`
    pub fn derived(class: &ClassDecl, parent: &ClassLayout) -> Self {
        let mut layout = Self::empty(&class.name);
        layout.superclass = Some(parent.name.clone());
        layout.fields = parent.fields.clone();
        layout.methods = parent.methods.clone();
        layout.add_members(class);
        layout
    }

    fn add_members(&mut self, class: &ClassDecl) {
        for field in &class.fields {
            let slot = self.fields.len() + 1;
            debug!("{}: field '{}' at slot {}", self.name, field.name, slot);
            self.fields.push(FieldSlot {
                name: field.name.clone(),
                slot,
            });
        }

        for method in &class.methods {
            let entry = MethodEntry::from_decl(&class.name, method);
            match method.kind {
                MethodKind::Virtual => self.insert_virtual(entry),
                MethodKind::Static | MethodKind::Library => self.static_methods.push(entry),
            }
        }
    }

    fn insert_virtual(&mut self, entry: MethodEntry) {
        if let Some(slot) = self.methods.iter().position(|m| m.name == entry.name) {
            debug!(
                "{}: '{}' overrides {} at slot {}",
                self.name,
                entry.name,
                self.methods[slot].virtual_label(),
                slot
            );
            self.methods[slot] = entry;
        } else {
            debug!("{}: method '{}' at slot {}", self.name, entry.name, self.methods.len());
            self.methods.push(entry);
        }
    }

    pub fn field_slot(&self, name: &str) -> Option<usize> {
        self.fields.iter().find(|f| f.name == name).map(|f| f.slot)
    }

    pub fn method_slot(&self, name: &str) -> Option<usize> {
        self.methods.iter().position(|m| m.name == name)
    }

    pub fn method(&self, name: &str) -> Option<&MethodEntry> {
        self.methods.iter().find(|m| m.name == name)
    }

    pub fn static_method(&self, name: &str) -> Option<&MethodEntry> {
        self.static_methods.iter().find(|m| m.name == name)
    }

    pub fn fields(&self) -> &[FieldSlot] {
        &self.fields
    }

    pub fn methods(&self) -> &[MethodEntry] {
        &self.methods
    }

    /// Highest field slot, 0 for a class without fields
    pub fn max_field_slot(&self) -> usize {
        self.fields.len()
    }

    /// Instance size in bytes, dispatch pointer included
    pub fn size_in_bytes(&self) -> usize {
        (self.max_field_slot() + 1) * WORD_SIZE
    }

    /// Name of the dispatch vector label, `_DV_<Class>`
    pub fn dispatch_label(&self) -> String {
        dispatch_label(&self.name)
    }

    /// `_DV_<Class>: [<labels in slot order>]`
    pub fn render_dispatch_vector(&self) -> String {
        let labels: Vec<String> = self.methods.iter().map(MethodEntry::virtual_label).collect();
        format!("{}: [{}]", self.dispatch_label(), labels.join(", "))
    }
}

pub fn dispatch_label(class_name: &str) -> String {
    format!("_DV_{}", class_name)
}

impl fmt::Display for ClassLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Class Name: {}", self.name)?;
        if let Some(parent) = &self.superclass {
            write!(f, " : {}", parent)?;
        }
        writeln!(f)?;
        writeln!(f, "  > Fields:")?;
        for field in &self.fields {
            writeln!(f, "    - {}. {}", field.slot, field.name)?;
        }
        writeln!(f, "  > Methods:")?;
        for (slot, method) in self.methods.iter().enumerate() {
            writeln!(f, "    - {}. {}", slot, method.name)?;
        }
        if !self.static_methods.is_empty() {
            writeln!(f, "  > Static:")?;
            for method in &self.static_methods {
                writeln!(f, "    - {}", method.name)?;
            }
        }
        Ok(())
    }
}

/// Layouts of every class of a program, in resolution order
#[derive(Debug, Clone, Default, Serialize)]
pub struct LayoutManager {
    layouts: Vec<ClassLayout>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl LayoutManager {
    /// Build all layouts. Classes without a superclass come first in
    /// declaration order, then subclasses as soon as their parent is known.
    pub fn build(program: &Program) -> Result<Self, CodegenError> {
        let mut manager = Self::default();
        let mut pending: Vec<&ClassDecl> = Vec::new();

        for class in &program.classes {
            if class.superclass.is_none() {
                manager.insert(ClassLayout::root(class));
            } else {
                pending.push(class);
            }
        }

        while !pending.is_empty() {
            let before = pending.len();
            let mut waiting = Vec::new();
            for class in pending {
                let parent_name = class.superclass.as_deref().unwrap_or_default();
                let layout = manager.get(parent_name).ok().map(|parent| ClassLayout::derived(class, parent));
                match layout {
                    Some(layout) => manager.insert(layout),
                    None => waiting.push(class),
                }
            }
            if waiting.len() == before {
                return Err(CodegenError::UnresolvedInheritance {
                    classes: waiting.iter().map(|c| c.name.clone()).collect(),
                });
            }
            pending = waiting;
        }

        Ok(manager)
    }

    fn insert(&mut self, layout: ClassLayout) {
        debug!(
            "layout of {}: {} field(s), {} method slot(s), {} bytes",
            layout.name,
            layout.fields.len(),
            layout.methods.len(),
            layout.size_in_bytes()
        );
        self.index.insert(layout.name.clone(), self.layouts.len());
        self.layouts.push(layout);
    }

    pub fn get(&self, class_name: &str) -> Result<&ClassLayout, CodegenError> {
        self.index
            .get(class_name)
            .map(|&i| &self.layouts[i])
            .ok_or_else(|| CodegenError::UnknownClass {
                name: class_name.to_string(),
            })
    }

    pub fn field_slot(&self, class_name: &str, field: &str) -> Result<usize, CodegenError> {
        self.get(class_name)?
            .field_slot(field)
            .ok_or_else(|| CodegenError::UnknownField {
                class: class_name.to_string(),
                field: field.to_string(),
            })
    }

    /// Dispatch slot and descriptor of a virtual method
    pub fn virtual_method(&self, class_name: &str, method: &str) -> Result<(usize, &MethodEntry), CodegenError> {
        let layout = self.get(class_name)?;
        layout
            .method_slot(method)
            .map(|slot| (slot, &layout.methods[slot]))
            .ok_or_else(|| CodegenError::UnknownMethod {
                class: class_name.to_string(),
                method: method.to_string(),
            })
    }

    pub fn static_method(&self, class_name: &str, method: &str) -> Result<&MethodEntry, CodegenError> {
        self.get(class_name)?
            .static_method(method)
            .ok_or_else(|| CodegenError::UnknownStaticMethod {
                class: class_name.to_string(),
                method: method.to_string(),
            })
    }

    pub fn iter(&self) -> impl Iterator<Item = &ClassLayout> {
        self.layouts.iter()
    }

    /// One dispatch vector line per class, the library class excluded
    pub fn render_dispatch_vectors(&self) -> String {
        let mut out = String::new();
        for layout in self.layouts.iter().filter(|l| l.name != LIBRARY_CLASS) {
            out.push_str(&layout.render_dispatch_vector());
            out.push('\n');
        }
        out
    }
}

impl fmt::Display for LayoutManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for layout in &self.layouts {
            write!(f, "{}", layout)?;
        }
        Ok(())
    }
}
