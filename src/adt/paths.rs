//! adt::paths
//!
//! Canonical addressing for repository objects.
//!
//! # Design
//!
//! Each object kind maps to a fixed path template under `/sap/bc/adt/`.
//! Object names are case-insensitive and lower-cased in paths. Function
//! modules are nested under their housing group. Tables have no source
//! concept; a table "source" read routes to the structure-definition
//! fetch instead of `/source/main`.

use std::str::FromStr;

use super::AdtError;

/// Path of the repository's quick-search endpoint.
pub const SEARCH_PATH: &str = "/sap/bc/adt/repository/informationsystem/search";

/// Path of the generic activation endpoint.
pub const ACTIVATION_PATH: &str = "/sap/bc/adt/activation";

/// Path of the discovery document; usable as a connectivity check.
pub const DISCOVERY_PATH: &str = "/sap/bc/adt/discovery";

/// A kind of repository object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    /// Global class.
    Class,
    /// Global interface.
    Interface,
    /// Executable program (report).
    Program,
    /// Function group.
    FunctionGroup,
    /// Function module, housed in a group.
    FunctionModule,
    /// Database table definition.
    Table,
}

impl ObjectKind {
    /// Kinds accepted by [`FromStr`], for error messages.
    pub const SUPPORTED: &'static str =
        "class, interface, program, function-group, function-module, table";

    /// Path of the object itself (lock/unlock target, metadata).
    ///
    /// Function modules need their group; use [`function_module_path`].
    pub fn object_path(&self, name: &str) -> String {
        let n = name.to_lowercase();
        match self {
            ObjectKind::Class => format!("/sap/bc/adt/oo/classes/{}", n),
            ObjectKind::Interface => format!("/sap/bc/adt/oo/interfaces/{}", n),
            ObjectKind::Program => format!("/sap/bc/adt/programs/programs/{}", n),
            ObjectKind::FunctionGroup => format!("/sap/bc/adt/functions/groups/{}", n),
            ObjectKind::FunctionModule => {
                // Group-relative; callers go through function_module_path.
                format!("/sap/bc/adt/functions/groups/_/fmodules/{}", n)
            }
            ObjectKind::Table => format!("/sap/bc/adt/ddic/tables/{}", n),
        }
    }

    /// Collection path creations are POSTed to.
    pub fn collection_path(&self) -> &'static str {
        match self {
            ObjectKind::Class => "/sap/bc/adt/oo/classes",
            ObjectKind::Interface => "/sap/bc/adt/oo/interfaces",
            ObjectKind::Program => "/sap/bc/adt/programs/programs",
            ObjectKind::FunctionGroup => "/sap/bc/adt/functions/groups",
            // Modules are created under their group's collection.
            ObjectKind::FunctionModule => "/sap/bc/adt/functions/groups",
            ObjectKind::Table => "/sap/bc/adt/ddic/tables",
        }
    }

    /// Whether the kind carries editable source code.
    pub fn has_source(&self) -> bool {
        !matches!(self, ObjectKind::Table)
    }

    /// Path of the object's main source include.
    pub fn source_path(&self, name: &str) -> String {
        format!("{}/source/main", self.object_path(name))
    }
}

impl std::fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ObjectKind::Class => write!(f, "class"),
            ObjectKind::Interface => write!(f, "interface"),
            ObjectKind::Program => write!(f, "program"),
            ObjectKind::FunctionGroup => write!(f, "function-group"),
            ObjectKind::FunctionModule => write!(f, "function-module"),
            ObjectKind::Table => write!(f, "table"),
        }
    }
}

impl FromStr for ObjectKind {
    type Err = AdtError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "class" => Ok(ObjectKind::Class),
            "interface" => Ok(ObjectKind::Interface),
            "program" | "report" => Ok(ObjectKind::Program),
            "function-group" | "functiongroup" | "fugr" | "function" => {
                Ok(ObjectKind::FunctionGroup)
            }
            "function-module" | "functionmodule" | "fmodule" => Ok(ObjectKind::FunctionModule),
            "table" => Ok(ObjectKind::Table),
            other => Err(AdtError::UnsupportedKind {
                kind: other.to_string(),
                supported: Self::SUPPORTED.to_string(),
            }),
        }
    }
}

/// Path of a function module nested under its group.
pub fn function_module_path(group: &str, name: &str) -> String {
    format!(
        "/sap/bc/adt/functions/groups/{}/fmodules/{}",
        group.to_lowercase(),
        name.to_lowercase()
    )
}

/// Collection path for creating modules inside a group.
pub fn function_module_collection(group: &str) -> String {
    format!(
        "/sap/bc/adt/functions/groups/{}/fmodules",
        group.to_lowercase()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_are_lowercased() {
        assert_eq!(
            ObjectKind::Class.object_path("ZCL_DEMO"),
            "/sap/bc/adt/oo/classes/zcl_demo"
        );
        assert_eq!(
            ObjectKind::Program.source_path("ZREPORT"),
            "/sap/bc/adt/programs/programs/zreport/source/main"
        );
    }

    #[test]
    fn function_module_nested_under_group() {
        assert_eq!(
            function_module_path("ZGROUP", "Z_GET_DATA"),
            "/sap/bc/adt/functions/groups/zgroup/fmodules/z_get_data"
        );
        assert_eq!(
            function_module_collection("ZGROUP"),
            "/sap/bc/adt/functions/groups/zgroup/fmodules"
        );
    }

    #[test]
    fn table_has_no_source() {
        assert!(!ObjectKind::Table.has_source());
        assert!(ObjectKind::Class.has_source());
        assert_eq!(
            ObjectKind::Table.object_path("MARA"),
            "/sap/bc/adt/ddic/tables/mara"
        );
    }

    #[test]
    fn kind_parsing_accepts_aliases() {
        assert_eq!("report".parse::<ObjectKind>().unwrap(), ObjectKind::Program);
        assert_eq!(
            "fugr".parse::<ObjectKind>().unwrap(),
            ObjectKind::FunctionGroup
        );
        assert_eq!(
            "function".parse::<ObjectKind>().unwrap(),
            ObjectKind::FunctionGroup
        );
        assert_eq!(
            "FUNCTION-MODULE".parse::<ObjectKind>().unwrap(),
            ObjectKind::FunctionModule
        );
    }

    #[test]
    fn unknown_kind_lists_supported_set() {
        let err = "view".parse::<ObjectKind>().unwrap_err();
        match err {
            AdtError::UnsupportedKind { kind, supported } => {
                assert_eq!(kind, "view");
                assert!(supported.contains("class"));
                assert!(supported.contains("table"));
            }
            other => panic!("expected UnsupportedKind, got {:?}", other),
        }
    }
}
