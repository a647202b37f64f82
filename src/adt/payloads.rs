//! adt::payloads
//!
//! XML bodies the repository protocol speaks, and tolerant extraction of
//! the pieces we need back out of its responses.
//!
//! # Design
//!
//! The repository's XML dialects are stable, attribute-heavy, and
//! shallow. Responses are mined with targeted patterns rather than a
//! full XML parse: the lock handle lives in one fixed tag, and search
//! hits are flat `adtcore:objectReference` elements whose attributes
//! carry everything. Absence of a match is never fatal here; callers
//! decide what a missing piece means.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

/// Content type for class creation payloads.
pub const CLASS_CONTENT_TYPE: &str = "application/vnd.sap.adt.oo.classes.v4+xml";

/// Content type for program creation payloads.
pub const PROGRAM_CONTENT_TYPE: &str = "application/vnd.sap.adt.programs.programs.v2+xml";

/// Content type for function group creation payloads.
pub const GROUP_CONTENT_TYPE: &str = "application/vnd.sap.adt.functions.groups.v3+xml";

/// Content type for function module creation payloads.
pub const MODULE_CONTENT_TYPE: &str = "application/vnd.sap.adt.functions.fmodules.v3+xml";

/// Accept header for lock results.
pub const LOCK_RESULT_ACCEPT: &str = "application/vnd.sap.as.adt.lock.result.v1+xml";

/// A single hit returned by search or package listing.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ObjectReference {
    /// Object name.
    pub name: String,
    /// Repository type code (e.g. `CLAS/OC`).
    #[serde(rename = "type")]
    pub object_type: String,
    /// Canonical object URI.
    pub uri: String,
    /// Short description, empty when absent.
    pub description: String,
    /// Housing package, empty when absent.
    pub package_name: String,
}

/// Escape a string for use inside an XML attribute value.
pub fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Creation payload for a program.
pub fn program_xml(name: &str, description: &str, package: &str, language: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<program:abapProgram
    xmlns:program="http://www.sap.com/adt/programs/programs"
    xmlns:adtcore="http://www.sap.com/adt/core"
    adtcore:description="{desc}"
    adtcore:language="{lang}"
    adtcore:name="{name}"
    adtcore:type="PROG/P"
    program:programType="1">
  <adtcore:packageRef adtcore:name="{pkg}"/>
</program:abapProgram>"#,
        desc = xml_escape(description),
        lang = xml_escape(language),
        name = xml_escape(name),
        pkg = xml_escape(package),
    )
}

/// Creation payload for a class.
pub fn class_xml(name: &str, description: &str, package: &str, language: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<class:abapClass
    xmlns:class="http://www.sap.com/adt/oo/classes"
    xmlns:adtcore="http://www.sap.com/adt/core"
    adtcore:description="{desc}"
    adtcore:language="{lang}"
    adtcore:name="{name}"
    adtcore:type="CLAS/OC"
    class:final="true"
    class:visibility="public">
  <adtcore:packageRef adtcore:name="{pkg}"/>
</class:abapClass>"#,
        desc = xml_escape(description),
        lang = xml_escape(language),
        name = xml_escape(name),
        pkg = xml_escape(package),
    )
}

/// Creation payload for a function group.
pub fn function_group_xml(name: &str, description: &str, package: &str, language: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<group:abapFunctionGroup
    xmlns:group="http://www.sap.com/adt/functions/groups"
    xmlns:adtcore="http://www.sap.com/adt/core"
    adtcore:description="{desc}"
    adtcore:language="{lang}"
    adtcore:name="{name}"
    adtcore:type="FUGR/F">
  <adtcore:packageRef adtcore:name="{pkg}"/>
</group:abapFunctionGroup>"#,
        desc = xml_escape(description),
        lang = xml_escape(language),
        name = xml_escape(name),
        pkg = xml_escape(package),
    )
}

/// Creation payload for a function module inside its group.
pub fn function_module_xml(name: &str, description: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<fmodule:abapFunctionModule
    xmlns:fmodule="http://www.sap.com/adt/functions/fmodules"
    xmlns:adtcore="http://www.sap.com/adt/core"
    adtcore:description="{desc}"
    adtcore:name="{name}"
    adtcore:type="FUGR/FF"/>"#,
        desc = xml_escape(description),
        name = xml_escape(name),
    )
}

/// Activation request referencing one object by URI and name.
pub fn activation_xml(uri: &str, name: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<adtcore:objectReferences xmlns:adtcore="http://www.sap.com/adt/core">
  <adtcore:objectReference adtcore:uri="{uri}" adtcore:name="{name}"/>
</adtcore:objectReferences>"#,
        uri = xml_escape(uri),
        name = xml_escape(name),
    )
}

fn lock_handle_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<LOCK_HANDLE>(.*?)</LOCK_HANDLE>").unwrap())
}

/// Extract the lock handle from a lock-result body.
///
/// Absence of a parsable handle is not an error; some successful locks
/// return no handle and the protocol continues without one.
pub fn extract_lock_handle(body: &str) -> Option<String> {
    lock_handle_re()
        .captures(body)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .filter(|h| !h.is_empty())
}

fn object_reference_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<adtcore:objectReference\b([^>]*?)/?>").unwrap())
}

fn attribute_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"([A-Za-z]+:[A-Za-z]+)="([^"]*)""#).unwrap())
}

/// Decode the XML attribute escapes we emit in [`xml_escape`].
fn xml_unescape(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

/// Pull one attribute out of an element's attribute region.
fn attr(region: &str, name: &str) -> Option<String> {
    attribute_re()
        .captures_iter(region)
        .find(|c| &c[1] == name)
        .map(|c| xml_unescape(&c[2]))
}

/// Parse all `adtcore:objectReference` hits out of a response body.
pub fn parse_object_references(body: &str) -> Vec<ObjectReference> {
    object_reference_re()
        .captures_iter(body)
        .filter_map(|caps| {
            let region = caps.get(1)?.as_str();
            Some(ObjectReference {
                name: attr(region, "adtcore:name")?,
                object_type: attr(region, "adtcore:type").unwrap_or_default(),
                uri: attr(region, "adtcore:uri").unwrap_or_default(),
                description: attr(region, "adtcore:description").unwrap_or_default(),
                package_name: attr(region, "adtcore:packageName").unwrap_or_default(),
            })
        })
        .collect()
}

/// Collect every namespaced attribute in a response body, first value
/// wins. Used for package metadata and generic object info.
pub fn parse_attributes(body: &str) -> BTreeMap<String, String> {
    let mut attrs = BTreeMap::new();
    for caps in attribute_re().captures_iter(body) {
        // Namespace declarations are noise, not object metadata.
        if caps[1].starts_with("xmlns:") {
            continue;
        }
        attrs
            .entry(caps[1].to_string())
            .or_insert_with(|| xml_unescape(&caps[2]));
    }
    attrs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_round_trip() {
        let raw = r#"a <b> & "c" 'd'"#;
        assert_eq!(xml_unescape(&xml_escape(raw)), raw);
    }

    #[test]
    fn program_xml_escapes_description() {
        let xml = program_xml("ZREP", "a \"quoted\" <desc>", "$TMP", "EN");
        assert!(xml.contains("adtcore:description=\"a &quot;quoted&quot; &lt;desc&gt;\""));
        assert!(xml.contains("adtcore:name=\"ZREP\""));
        assert!(xml.contains("adtcore:packageRef adtcore:name=\"$TMP\""));
    }

    #[test]
    fn lock_handle_extracted() {
        let body = "<DATA><LOCK_HANDLE>ABC123</LOCK_HANDLE></DATA>";
        assert_eq!(extract_lock_handle(body).as_deref(), Some("ABC123"));
    }

    #[test]
    fn lock_handle_absent_or_empty_is_none() {
        assert_eq!(extract_lock_handle("<DATA/>"), None);
        assert_eq!(
            extract_lock_handle("<LOCK_HANDLE></LOCK_HANDLE>"),
            None
        );
    }

    #[test]
    fn object_references_parsed() {
        let body = r#"<adtcore:objectReferences xmlns:adtcore="http://www.sap.com/adt/core">
  <adtcore:objectReference adtcore:uri="/sap/bc/adt/oo/classes/zcl_a" adtcore:type="CLAS/OC"
      adtcore:name="ZCL_A" adtcore:packageName="ZPKG" adtcore:description="First"/>
  <adtcore:objectReference adtcore:uri="/sap/bc/adt/programs/programs/zrep" adtcore:type="PROG/P"
      adtcore:name="ZREP"/>
</adtcore:objectReferences>"#;

        let refs = parse_object_references(body);
        assert_eq!(refs.len(), 2);
        assert_eq!(refs[0].name, "ZCL_A");
        assert_eq!(refs[0].package_name, "ZPKG");
        assert_eq!(refs[0].description, "First");
        assert_eq!(refs[1].name, "ZREP");
        assert_eq!(refs[1].description, "");
    }

    #[test]
    fn no_references_is_empty_vec() {
        assert!(parse_object_references("<adtcore:objectReferences/>").is_empty());
    }

    #[test]
    fn attributes_skip_namespace_declarations() {
        let body = r#"<pak:package xmlns:pak="http://www.sap.com/adt/packages"
            adtcore:name="ZPKG" adtcore:createdBy="DEVELOPER"/>"#;
        let attrs = parse_attributes(body);
        assert_eq!(attrs.get("adtcore:name").map(String::as_str), Some("ZPKG"));
        assert_eq!(
            attrs.get("adtcore:createdBy").map(String::as_str),
            Some("DEVELOPER")
        );
        assert!(!attrs.keys().any(|k| k.starts_with("xmlns:")));
    }

    #[test]
    fn activation_xml_names_uri_and_object() {
        let xml = activation_xml("/sap/bc/adt/oo/classes/zcl_a", "ZCL_A");
        assert!(xml.contains("adtcore:uri=\"/sap/bc/adt/oo/classes/zcl_a\""));
        assert!(xml.contains("adtcore:name=\"ZCL_A\""));
    }
}
