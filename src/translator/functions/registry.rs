//! Host Call → Cypher Function Registry
//!
//! Maps host-surface calls to Cypher function names for the plain-rename
//! cases. Calls with structural renderings (infix `CONTAINS`, duration
//! arithmetic, quantifier predicates) are handled by their category modules
//! and do not appear here.

use std::collections::HashMap;

use crate::expression::HostFn;

/// Function mapping entry
#[derive(Clone, Copy)]
pub struct FunctionMapping {
    /// Host-surface name (diagnostics only)
    #[allow(dead_code)]
    pub host_name: &'static str,
    /// Cypher function name
    pub cypher_name: &'static str,
}

/// Get the Cypher function name for a plain-rename host call.
pub fn cypher_function_name(function: HostFn) -> Option<&'static str> {
    FUNCTION_MAPPINGS.get(&function).map(|m| m.cypher_name)
}

// Static function mapping table
lazy_static::lazy_static! {
    static ref FUNCTION_MAPPINGS: HashMap<HostFn, FunctionMapping> = {
        let mut m = HashMap::new();

        // ===== STRING FUNCTIONS =====

        m.insert(HostFn::ToLower, FunctionMapping {
            host_name: "to_lower",
            cypher_name: "toLower",
        });
        m.insert(HostFn::ToUpper, FunctionMapping {
            host_name: "to_upper",
            cypher_name: "toUpper",
        });
        m.insert(HostFn::Trim, FunctionMapping {
            host_name: "trim",
            cypher_name: "trim",
        });
        // trim_start/trim_end -> ltrim/rtrim
        m.insert(HostFn::TrimStart, FunctionMapping {
            host_name: "trim_start",
            cypher_name: "ltrim",
        });
        m.insert(HostFn::TrimEnd, FunctionMapping {
            host_name: "trim_end",
            cypher_name: "rtrim",
        });
        m.insert(HostFn::Replace, FunctionMapping {
            host_name: "replace",
            cypher_name: "replace",
        });
        m.insert(HostFn::Substring, FunctionMapping {
            host_name: "substring",
            cypher_name: "substring",
        });
        // length/size -> size() for both strings and collections
        m.insert(HostFn::Length, FunctionMapping {
            host_name: "length",
            cypher_name: "size",
        });
        m.insert(HostFn::Size, FunctionMapping {
            host_name: "size",
            cypher_name: "size",
        });

        // ===== MATH FUNCTIONS =====

        m.insert(HostFn::Abs, FunctionMapping {
            host_name: "abs",
            cypher_name: "abs",
        });
        m.insert(HostFn::Floor, FunctionMapping {
            host_name: "floor",
            cypher_name: "floor",
        });
        // ceiling -> ceil
        m.insert(HostFn::Ceiling, FunctionMapping {
            host_name: "ceiling",
            cypher_name: "ceil",
        });
        m.insert(HostFn::Round, FunctionMapping {
            host_name: "round",
            cypher_name: "round",
        });
        m.insert(HostFn::Sqrt, FunctionMapping {
            host_name: "sqrt",
            cypher_name: "sqrt",
        });
        m.insert(HostFn::Sign, FunctionMapping {
            host_name: "sign",
            cypher_name: "sign",
        });
        m.insert(HostFn::Sin, FunctionMapping {
            host_name: "sin",
            cypher_name: "sin",
        });
        m.insert(HostFn::Cos, FunctionMapping {
            host_name: "cos",
            cypher_name: "cos",
        });
        m.insert(HostFn::Tan, FunctionMapping {
            host_name: "tan",
            cypher_name: "tan",
        });
        m.insert(HostFn::Exp, FunctionMapping {
            host_name: "exp",
            cypher_name: "exp",
        });
        m.insert(HostFn::Log, FunctionMapping {
            host_name: "log",
            cypher_name: "log",
        });

        // ===== AGGREGATES =====

        m.insert(HostFn::Count, FunctionMapping {
            host_name: "count",
            cypher_name: "count",
        });
        m.insert(HostFn::Sum, FunctionMapping {
            host_name: "sum",
            cypher_name: "sum",
        });
        m.insert(HostFn::Avg, FunctionMapping {
            host_name: "avg",
            cypher_name: "avg",
        });
        m.insert(HostFn::Min, FunctionMapping {
            host_name: "min",
            cypher_name: "min",
        });
        m.insert(HostFn::Max, FunctionMapping {
            host_name: "max",
            cypher_name: "max",
        });
        m.insert(HostFn::Collect, FunctionMapping {
            host_name: "collect",
            cypher_name: "collect",
        });

        m
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renames() {
        assert_eq!(cypher_function_name(HostFn::ToLower), Some("toLower"));
        assert_eq!(cypher_function_name(HostFn::Ceiling), Some("ceil"));
        assert_eq!(cypher_function_name(HostFn::TrimStart), Some("ltrim"));
        assert_eq!(cypher_function_name(HostFn::Length), Some("size"));
    }

    #[test]
    fn structural_calls_are_absent() {
        assert_eq!(cypher_function_name(HostFn::Contains), None);
        assert_eq!(cypher_function_name(HostFn::AddDays), None);
        assert_eq!(cypher_function_name(HostFn::Pow), None);
        assert_eq!(cypher_function_name(HostFn::AnyIn), None);
    }
}
