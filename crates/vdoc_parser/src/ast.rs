//! Interface records produced by the parser.
//!
//! Records are plain values: the reducer builds them during a single pass and
//! hands them out finished. Nothing links one record to another.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// Common declaration surface
// ============================================================================

/// The kind tag of a declaration, used for filtering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    /// A module.
    Module,
    /// A parameter or port.
    Parameter,
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectKind::Module => f.write_str("module"),
            ObjectKind::Parameter => f.write_str("parameter"),
        }
    }
}

/// Fields shared by every extracted declaration.
pub trait Declaration {
    /// The declared identifier.
    fn name(&self) -> &str;

    /// The kind tag.
    fn kind(&self) -> ObjectKind;

    /// Documentation lines attached from `//#` comments, if any.
    fn description(&self) -> Option<&[String]>;

    /// The innermost conditional guard active at the declaration, as
    /// `<directive>=<name>` (e.g. `` `ifdef=DEBUG ``).
    fn define(&self) -> Option<&str>;
}

// ============================================================================
// Parameters and ports
// ============================================================================

/// The direction of a port, or `In` for a parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortMode {
    /// Parameter value flowing into the module.
    In,
    /// `input`
    Input,
    /// `inout`
    Inout,
    /// `output`
    Output,
}

impl PortMode {
    /// Parses a direction keyword.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "in" => Some(PortMode::In),
            "input" => Some(PortMode::Input),
            "inout" => Some(PortMode::Inout),
            "output" => Some(PortMode::Output),
            _ => None,
        }
    }

    /// Returns the keyword spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            PortMode::In => "in",
            PortMode::Input => "input",
            PortMode::Inout => "inout",
            PortMode::Output => "output",
        }
    }
}

impl fmt::Display for PortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A module parameter or port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerilogParameter {
    /// The identifier.
    pub name: String,
    /// Direction; `In` for parameters.
    pub mode: Option<PortMode>,
    /// Synthesized type text: net type, bit range, array dimension. May be empty.
    pub data_type: String,
    /// Literal default value (parameters only).
    pub default_value: Option<String>,
    /// Attached documentation lines.
    pub description: Option<Vec<String>>,
    /// Innermost active guard at the declaration.
    pub define: Option<String>,
}

impl VerilogParameter {
    /// Creates a port record.
    pub fn port(
        name: impl Into<String>,
        mode: PortMode,
        data_type: impl Into<String>,
        define: Option<String>,
    ) -> Self {
        Self {
            name: name.into(),
            mode: Some(mode),
            data_type: data_type.into(),
            default_value: None,
            description: None,
            define,
        }
    }

    /// Creates a parameter record with mode `In`.
    pub fn generic(
        name: impl Into<String>,
        data_type: impl Into<String>,
        default_value: impl Into<String>,
        define: Option<String>,
    ) -> Self {
        Self {
            name: name.into(),
            mode: Some(PortMode::In),
            data_type: data_type.into(),
            default_value: Some(default_value.into()),
            description: None,
            define,
        }
    }

    /// Returns `true` if the type carries a bit range or array dimension.
    pub fn is_array(&self) -> bool {
        is_array(&self.data_type)
    }
}

impl Declaration for VerilogParameter {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> ObjectKind {
        ObjectKind::Parameter
    }

    fn description(&self) -> Option<&[String]> {
        self.description.as_deref()
    }

    fn define(&self) -> Option<&str> {
        self.define.as_deref()
    }
}

impl fmt::Display for VerilogParameter {
    /// Formats as `name : mode type` with an optional ` := default` suffix.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let head = match self.mode {
            Some(mode) => format!("{} : {} {}", self.name, mode, self.data_type),
            None => format!("{} : {}", self.name, self.data_type),
        };
        f.write_str(head.trim_end())?;
        if let Some(default) = &self.default_value {
            write!(f, " := {default}")?;
        }
        Ok(())
    }
}

/// Returns `true` if a synthesized type string contains a bracketed specifier.
pub fn is_array(data_type: &str) -> bool {
    data_type.contains('[')
}

// ============================================================================
// Modules
// ============================================================================

/// A module and its interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerilogModule {
    /// The module name.
    pub name: String,
    /// Ports sorted by name, unique by name.
    pub ports: Vec<VerilogParameter>,
    /// Parameters in declaration order.
    pub generics: Vec<VerilogParameter>,
    /// Section labels keyed by the number of ports declared before the marker.
    pub sections: BTreeMap<usize, String>,
    /// Documentation lines preceding the first item of the module.
    pub description: Option<Vec<String>>,
    /// Innermost guard active where the module opened.
    pub define: Option<String>,
}

impl VerilogModule {
    /// Looks up a port by name.
    pub fn port(&self, name: &str) -> Option<&VerilogParameter> {
        self.ports
            .binary_search_by(|p| p.name.as_str().cmp(name))
            .ok()
            .map(|i| &self.ports[i])
    }

    /// Looks up a parameter by name.
    pub fn generic(&self, name: &str) -> Option<&VerilogParameter> {
        self.generics.iter().find(|g| g.name == name)
    }
}

impl Declaration for VerilogModule {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> ObjectKind {
        ObjectKind::Module
    }

    fn description(&self) -> Option<&[String]> {
        self.description.as_deref()
    }

    fn define(&self) -> Option<&str> {
        self.define.as_deref()
    }
}

impl fmt::Display for VerilogModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ports: Vec<&str> = self.ports.iter().map(|p| p.name.as_str()).collect();
        write!(f, "module {} [{}]", self.name, ports.join(", "))
    }
}

// ============================================================================
// Tagged declaration
// ============================================================================

/// Any extracted top-level declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerilogObject {
    /// A module.
    Module(VerilogModule),
    /// A free-standing parameter or port.
    Parameter(VerilogParameter),
}

impl VerilogObject {
    /// Returns the module, if this is one.
    pub fn as_module(&self) -> Option<&VerilogModule> {
        match self {
            VerilogObject::Module(m) => Some(m),
            VerilogObject::Parameter(_) => None,
        }
    }

    /// Returns `true` if this object carries the given kind tag.
    pub fn is_kind(&self, kind: ObjectKind) -> bool {
        self.kind() == kind
    }
}

impl From<VerilogModule> for VerilogObject {
    fn from(module: VerilogModule) -> Self {
        VerilogObject::Module(module)
    }
}

impl From<VerilogParameter> for VerilogObject {
    fn from(param: VerilogParameter) -> Self {
        VerilogObject::Parameter(param)
    }
}

impl Declaration for VerilogObject {
    fn name(&self) -> &str {
        match self {
            VerilogObject::Module(m) => m.name(),
            VerilogObject::Parameter(p) => p.name(),
        }
    }

    fn kind(&self) -> ObjectKind {
        match self {
            VerilogObject::Module(m) => m.kind(),
            VerilogObject::Parameter(p) => p.kind(),
        }
    }

    fn description(&self) -> Option<&[String]> {
        match self {
            VerilogObject::Module(m) => m.description(),
            VerilogObject::Parameter(p) => p.description(),
        }
    }

    fn define(&self) -> Option<&str> {
        match self {
            VerilogObject::Module(m) => m.define(),
            VerilogObject::Parameter(p) => p.define(),
        }
    }
}
