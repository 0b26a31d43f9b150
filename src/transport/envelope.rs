//! SOAP 1.1 wire format: rpc/encoded envelope assembly and response
//! decoding.
//!
//! The endpoint speaks a fixed, positional, string-heavy subset of SOAP, so
//! the codec targets exactly that subset: typed scalar parameters on the way
//! out, a single `<return>` payload or a `<Fault>` element on the way back.

use std::fmt::Write as _;

use crate::domain::{GatewayFault, RemoteValue};

const ENVELOPE_OPEN: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8"?>"#,
    "\n",
    r#"<SOAP-ENV:Envelope xmlns:SOAP-ENV="http://schemas.xmlsoap.org/soap/envelope/""#,
    r#" xmlns:ns1="urn:Web2Sms""#,
    r#" xmlns:xsd="http://www.w3.org/2001/XMLSchema""#,
    r#" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance""#,
    r#" SOAP-ENV:encodingStyle="http://schemas.xmlsoap.org/soap/encoding/">"#,
    "<SOAP-ENV:Body>",
);
const ENVELOPE_CLOSE: &str = "</SOAP-ENV:Body></SOAP-ENV:Envelope>";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Param {
    name: &'static str,
    value: ParamValue,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ParamValue {
    Text(String),
    Int(u32),
    Bool(bool),
    Nil,
}

impl Param {
    pub(crate) fn text(name: &'static str, value: impl Into<String>) -> Self {
        Self {
            name,
            value: ParamValue::Text(value.into()),
        }
    }

    /// Text parameter that encodes as `xsi:nil` when absent.
    pub(crate) fn opt_text(name: &'static str, value: Option<&str>) -> Self {
        match value {
            Some(value) => Self::text(name, value),
            None => Self {
                name,
                value: ParamValue::Nil,
            },
        }
    }

    pub(crate) fn int(name: &'static str, value: u32) -> Self {
        Self {
            name,
            value: ParamValue::Int(value),
        }
    }

    pub(crate) fn bool(name: &'static str, value: bool) -> Self {
        Self {
            name,
            value: ParamValue::Bool(value),
        }
    }
}

/// Assemble the envelope for one rpc call with positional parameters.
pub(crate) fn encode_call(operation: &str, params: &[Param]) -> String {
    let mut xml = String::with_capacity(512);
    xml.push_str(ENVELOPE_OPEN);
    let _ = write!(xml, "<ns1:{operation}>");
    for param in params {
        let name = param.name;
        match &param.value {
            ParamValue::Text(value) => {
                let _ = write!(
                    xml,
                    r#"<{name} xsi:type="xsd:string">{}</{name}>"#,
                    escape(value)
                );
            }
            ParamValue::Int(value) => {
                let _ = write!(xml, r#"<{name} xsi:type="xsd:int">{value}</{name}>"#);
            }
            ParamValue::Bool(value) => {
                let _ = write!(xml, r#"<{name} xsi:type="xsd:boolean">{value}</{name}>"#);
            }
            ParamValue::Nil => {
                let _ = write!(xml, r#"<{name} xsi:nil="true"/>"#);
            }
        }
    }
    let _ = write!(xml, "</ns1:{operation}>");
    xml.push_str(ENVELOPE_CLOSE);
    xml
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Decoded {
    Value(RemoteValue),
    Fault(GatewayFault),
}

#[derive(Debug, thiserror::Error)]
pub(crate) enum DecodeError {
    #[error("gateway response carries no return value or fault")]
    MissingPayload,
}

/// Decode a response body into the returned value or the fault it reports.
pub(crate) fn decode_response(xml: &str) -> Result<Decoded, DecodeError> {
    if let Some(fault) = find_element(xml, "Fault") {
        let code = find_element(fault.inner, "faultcode").map(|el| unescape(el.inner.trim()));
        let message = find_element(fault.inner, "faultstring")
            .map(|el| unescape(el.inner.trim()))
            .unwrap_or_else(|| "unknown gateway fault".to_owned());
        let detail = find_element(fault.inner, "detail")
            .map(|el| el.inner.trim())
            .filter(|inner| !inner.is_empty())
            .map(str::to_owned);
        return Ok(Decoded::Fault(GatewayFault {
            code,
            message,
            detail,
        }));
    }

    if let Some(ret) = find_element(xml, "return") {
        return Ok(Decoded::Value(decode_return(&ret)));
    }

    Err(DecodeError::MissingPayload)
}

fn decode_return(element: &Element<'_>) -> RemoteValue {
    // Untyped payloads read as strings; a nil or non-string type is not a
    // value the caller can use as text.
    let nil = element.attributes.contains(r#"nil="true""#);
    let string_typed = match element.attributes.find("type=") {
        None => true,
        Some(_) => element.attributes.contains(":string"),
    };
    if nil || !string_typed {
        RemoteValue::Other(element.inner.trim().to_owned())
    } else {
        RemoteValue::Text(unescape(element.inner))
    }
}

struct Element<'a> {
    attributes: &'a str,
    inner: &'a str,
}

/// Find the first element whose local name matches, ignoring any namespace
/// prefix. Good enough for the fixed response shapes this endpoint emits;
/// CDATA and comments inside the payload are not interpreted.
fn find_element<'a>(xml: &'a str, local: &str) -> Option<Element<'a>> {
    let mut search_from = 0;
    while let Some(rel) = xml[search_from..].find('<') {
        let start = search_from + rel;
        search_from = start + 1;
        let rest = &xml[start + 1..];

        let name_end = rest
            .find(|c: char| c.is_whitespace() || c == '>' || c == '/')
            .unwrap_or(rest.len());
        let name = &rest[..name_end];
        if name.is_empty() || name.starts_with('?') || name.starts_with('!') {
            continue;
        }
        let local_part = name.rsplit(':').next().unwrap_or(name);
        if local_part != local {
            continue;
        }

        let after_name = &rest[name_end..];
        let tag_close = after_name.find('>')?;
        let raw_attributes = &after_name[..tag_close];
        let self_closing = raw_attributes.trim_end().ends_with('/');
        let attributes = raw_attributes.trim().trim_end_matches('/').trim_end();
        if self_closing {
            return Some(Element {
                attributes,
                inner: "",
            });
        }

        let inner_start = start + 1 + name_end + tag_close + 1;
        let closing = format!("</{name}>");
        let inner_len = xml[inner_start..].find(&closing)?;
        return Some(Element {
            attributes,
            inner: &xml[inner_start..inner_start + inner_len],
        });
    }
    None
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            other => out.push(other),
        }
    }
    out
}

fn unescape(text: &str) -> String {
    const ENTITIES: [(&str, char); 5] = [
        ("&lt;", '<'),
        ("&gt;", '>'),
        ("&quot;", '"'),
        ("&apos;", '\''),
        ("&amp;", '&'),
    ];

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(idx) = rest.find('&') {
        out.push_str(&rest[..idx]);
        rest = &rest[idx..];
        match ENTITIES.iter().find(|(entity, _)| rest.starts_with(entity)) {
            Some((entity, ch)) => {
                out.push(*ch);
                rest = &rest[entity.len()..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_call_wraps_operation_and_positional_params() {
        let xml = encode_call(
            "sendSession",
            &[
                Param::text("sessionId", "tok"),
                Param::text("recipient", "0712345678"),
                Param::text("message", "hi"),
                Param::opt_text("scheduledDate", None),
                Param::text("sender", "0740123456"),
                Param::int("validity", 120),
            ],
        );

        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert!(xml.contains("<ns1:sendSession>"));
        assert!(xml.contains(r#"<sessionId xsi:type="xsd:string">tok</sessionId>"#));
        assert!(xml.contains(r#"<scheduledDate xsi:nil="true"/>"#));
        assert!(xml.contains(r#"<validity xsi:type="xsd:int">120</validity>"#));
        assert!(xml.ends_with("</SOAP-ENV:Body></SOAP-ENV:Envelope>"));

        // Positional: parameters appear in declaration order.
        let session_at = xml.find("<sessionId").unwrap();
        let recipient_at = xml.find("<recipient").unwrap();
        let validity_at = xml.find("<validity").unwrap();
        assert!(session_at < recipient_at && recipient_at < validity_at);
    }

    #[test]
    fn encode_call_escapes_markup_in_values() {
        let xml = encode_call("sendSMS", &[Param::text("message", r#"a<b & "c""#)]);
        assert!(xml.contains("a&lt;b &amp; &quot;c&quot;"));
    }

    #[test]
    fn encode_call_renders_booleans() {
        let xml = encode_call("sendSMS", &[Param::bool("isUnicode", true)]);
        assert!(xml.contains(r#"<isUnicode xsi:type="xsd:boolean">true</isUnicode>"#));
    }

    #[test]
    fn decode_string_return() {
        let xml = r#"<?xml version="1.0"?>
            <SOAP-ENV:Envelope xmlns:SOAP-ENV="http://schemas.xmlsoap.org/soap/envelope/">
              <SOAP-ENV:Body>
                <ns1:sendSmsAuthKeyResponse>
                  <return xsi:type="xsd:string">abc&amp;def</return>
                </ns1:sendSmsAuthKeyResponse>
              </SOAP-ENV:Body>
            </SOAP-ENV:Envelope>"#;

        let decoded = decode_response(xml).unwrap();
        assert_eq!(
            decoded,
            Decoded::Value(RemoteValue::Text("abc&def".to_owned()))
        );
    }

    #[test]
    fn decode_untyped_return_reads_as_string() {
        let xml = "<Envelope><Body><openSessionResponse><return>tok</return></openSessionResponse></Body></Envelope>";
        let decoded = decode_response(xml).unwrap();
        assert_eq!(decoded, Decoded::Value(RemoteValue::Text("tok".to_owned())));
    }

    #[test]
    fn decode_non_string_return_is_other() {
        let xml = r#"<Envelope><Body><r><return xsi:type="xsd:boolean">true</return></r></Body></Envelope>"#;
        let decoded = decode_response(xml).unwrap();
        assert_eq!(
            decoded,
            Decoded::Value(RemoteValue::Other("true".to_owned()))
        );
    }

    #[test]
    fn decode_nil_return_is_other() {
        let xml = r#"<Envelope><Body><r><return xsi:nil="true"/></r></Body></Envelope>"#;
        let decoded = decode_response(xml).unwrap();
        assert_eq!(decoded, Decoded::Value(RemoteValue::Other(String::new())));
    }

    #[test]
    fn decode_fault_extracts_code_message_and_detail() {
        let xml = r#"<SOAP-ENV:Envelope xmlns:SOAP-ENV="http://schemas.xmlsoap.org/soap/envelope/">
          <SOAP-ENV:Body>
            <SOAP-ENV:Fault>
              <faultcode>SOAP-ENV:Server</faultcode>
              <faultstring>Authentication failed</faultstring>
              <detail><info>bad key</info></detail>
            </SOAP-ENV:Fault>
          </SOAP-ENV:Body>
        </SOAP-ENV:Envelope>"#;

        match decode_response(xml).unwrap() {
            Decoded::Fault(fault) => {
                assert_eq!(fault.code.as_deref(), Some("SOAP-ENV:Server"));
                assert_eq!(fault.message, "Authentication failed");
                assert_eq!(fault.detail.as_deref(), Some("<info>bad key</info>"));
            }
            other => panic!("expected fault, got {other:?}"),
        }
    }

    #[test]
    fn decode_fault_without_detail() {
        let xml = "<Envelope><Body><Fault><faultcode>HTTP</faultcode><faultstring>oops</faultstring><detail/></Fault></Body></Envelope>";
        match decode_response(xml).unwrap() {
            Decoded::Fault(fault) => {
                assert_eq!(fault.message, "oops");
                assert_eq!(fault.detail, None);
            }
            other => panic!("expected fault, got {other:?}"),
        }
    }

    #[test]
    fn decode_rejects_payload_free_bodies() {
        assert!(decode_response("<html>gateway offline</html>").is_err());
        assert!(decode_response("").is_err());
    }

    #[test]
    fn unescape_handles_lone_ampersands() {
        assert_eq!(unescape("a &amp; b & c"), "a & b & c");
        assert_eq!(unescape("&lt;tag&gt;"), "<tag>");
    }
}
