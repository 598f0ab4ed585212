//! XML Parser Module
//!
//! This module parses one DMARC aggregate XML report into normalized
//! authentication records. It enforces a recursion depth limit to protect
//! against attacks such as the Billion Laughs attack and completely disables
//! DOCTYPE processing by removing any DOCTYPE block from the input. If a
//! DOCTYPE block contains two or more entity definitions, the XML is rejected.
//!
//! The parse contract is all-or-nothing per document: a record missing any
//! required field, or carrying a non-numeric count, fails the whole document.

use crate::error::{AdvisorError, Result};
use crate::models::NormalizedRecord;
use quick_xml::events::Event;
use quick_xml::reader::Reader;

const MAX_DEPTH: u32 = 20;

/// Accumulates the fields of one `<record>` element until its end tag.
#[derive(Default)]
struct PartialRecord {
    source_ip: Option<String>,
    spf_result: Option<String>,
    dkim_result: Option<String>,
    disposition: Option<String>,
    count: Option<u64>,
    domain: Option<String>,
}

impl PartialRecord {
    fn finish(self) -> Result<NormalizedRecord> {
        Ok(NormalizedRecord {
            source_ip: self
                .source_ip
                .ok_or_else(|| AdvisorError::MissingField("row/source_ip".into()))?,
            spf_result: self
                .spf_result
                .ok_or_else(|| AdvisorError::MissingField("row/policy_evaluated/spf".into()))?,
            dkim_result: self
                .dkim_result
                .ok_or_else(|| AdvisorError::MissingField("row/policy_evaluated/dkim".into()))?,
            disposition: self.disposition.ok_or_else(|| {
                AdvisorError::MissingField("row/policy_evaluated/disposition".into())
            })?,
            count: self
                .count
                .ok_or_else(|| AdvisorError::MissingField("row/count".into()))?,
            domain: self.domain.unwrap_or_else(|| "Unknown".to_string()),
        })
    }
}

/// Parses a DMARC XML report and returns its records in document order.
///
/// # Arguments
///
/// * `xml_content` - A string slice containing the XML content.
///
/// # Errors
///
/// Returns an error if the XML cannot be parsed, if the recursion depth limit
/// is exceeded, if the DOCTYPE block (if present) defines two or more entity
/// definitions, or if any record is missing a required field.
pub fn parse_dmarc_report(xml_content: &str) -> Result<Vec<NormalizedRecord>> {
    // Check if the XML contains a DOCTYPE declaration.
    // If the DOCTYPE defines two or more entities, reject the XML.
    // Otherwise, remove the DOCTYPE block entirely.
    let cleaned_xml = if let Some(start) = xml_content.find("<!DOCTYPE") {
        if let Some(end) = xml_content[start..].find("]>") {
            let doctype = &xml_content[start..start + end + 2];
            let entity_count = doctype.matches("<!ENTITY").count();
            if entity_count >= 2 {
                return Err(AdvisorError::Format(
                    "Recursive entities detected".to_string(),
                ));
            }
            let before = &xml_content[..start];
            let after = &xml_content[start + end + 2..];
            format!("{}{}", before, after)
        } else {
            // If we cannot find the end of the DOCTYPE, use the original XML.
            xml_content.to_string()
        }
    } else {
        xml_content.to_string()
    };

    let mut reader = Reader::from_str(&cleaned_xml);

    let mut records = Vec::new();
    let mut current: Option<PartialRecord> = None;
    let mut in_row = false;
    let mut in_policy_evaluated = false;
    let mut in_identifiers = false;
    let mut depth: u32 = 0;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                depth += 1;
                if depth > MAX_DEPTH {
                    return Err(AdvisorError::Format(
                        "XML recursion depth limit exceeded".to_string(),
                    ));
                }
                match e.name().as_ref() {
                    b"record" => {
                        current = Some(PartialRecord::default());
                    }
                    b"row" => in_row = true,
                    b"policy_evaluated" => in_policy_evaluated = true,
                    b"identifiers" => in_identifiers = true,
                    b"source_ip" if in_row => {
                        let text = reader.read_text(e.name())?.trim().to_string();
                        if let Some(record) = current.as_mut() {
                            record.source_ip = Some(text);
                        }
                        // read_text consumed the matching end tag
                        depth = depth.saturating_sub(1);
                    }
                    b"count" if in_row => {
                        let text = reader.read_text(e.name())?.trim().to_string();
                        if let Some(record) = current.as_mut() {
                            record.count =
                                Some(text.parse().map_err(|_| AdvisorError::InvalidCount(text.clone()))?);
                        }
                        depth = depth.saturating_sub(1);
                    }
                    // Only the policy-evaluated verdicts count: an
                    // auth_results/spf subtree must not clobber them.
                    b"spf" if in_policy_evaluated => {
                        let text = reader.read_text(e.name())?.trim().to_string();
                        if let Some(record) = current.as_mut() {
                            record.spf_result = Some(text);
                        }
                        depth = depth.saturating_sub(1);
                    }
                    b"dkim" if in_policy_evaluated => {
                        let text = reader.read_text(e.name())?.trim().to_string();
                        if let Some(record) = current.as_mut() {
                            record.dkim_result = Some(text);
                        }
                        depth = depth.saturating_sub(1);
                    }
                    b"disposition" if in_policy_evaluated => {
                        let text = reader.read_text(e.name())?.trim().to_string();
                        if let Some(record) = current.as_mut() {
                            record.disposition = Some(text);
                        }
                        depth = depth.saturating_sub(1);
                    }
                    b"header_from" if in_identifiers => {
                        let text = reader.read_text(e.name())?.trim().to_string();
                        if let Some(record) = current.as_mut() {
                            record.domain = Some(text);
                        }
                        depth = depth.saturating_sub(1);
                    }
                    _ => {}
                }
            }
            Ok(Event::End(ref e)) => {
                match e.name().as_ref() {
                    b"record" => {
                        if let Some(partial) = current.take() {
                            records.push(partial.finish()?);
                        }
                    }
                    b"row" => in_row = false,
                    b"policy_evaluated" => in_policy_evaluated = false,
                    b"identifiers" => in_identifiers = false,
                    _ => {}
                }
                depth = depth.saturating_sub(1);
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(AdvisorError::Xml(e)),
            _ => (),
        }
    }

    Ok(records)
}
