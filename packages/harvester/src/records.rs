//! Record extraction: flatten the parsed directory tree into output records.
//!
//! Each directory entry contributes one record per correspondent account.
//! Entries without an accounts field are legitimate and contribute nothing;
//! entries without identity (BIC or participant name) fail the whole run.

use serde::Serialize;

use crate::config::{
    ACCOUNTS_TAG, ACCOUNT_ATTRIBUTE, BIC_ATTRIBUTE, ENTRY_TAG, NAME_ATTRIBUTE,
    PARTICIPANT_INFO_TAG, PSEUDO_ROOT_NAMES,
};
use crate::error::{HarvesterError, Result};
use crate::tree::{ParsedTree, XmlElement, XmlValue};

/// One flattened (bank, correspondent account) pair, ready for the
/// external storage layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputRecord {
    /// Bank identifier code.
    pub bic: String,
    /// Participant name.
    pub name: String,
    /// Correspondent account number.
    #[serde(rename = "corrAccount")]
    pub corr_account: String,
}

/// Flatten the parsed tree into records, in document order.
///
/// # Errors
/// `HarvesterError::Shape` when the document root is absent or ambiguous,
/// or when an entry misses a required field.
pub fn extract_records(tree: &ParsedTree) -> Result<Vec<OutputRecord>> {
    let root = find_document_root(tree)?;

    let entries = root.children.get(ENTRY_TAG).ok_or_else(|| {
        HarvesterError::Shape(format!("document root has no {ENTRY_TAG} elements"))
    })?;

    let mut records = Vec::new();
    for entry in entries.values() {
        let entry = entry.as_element().ok_or_else(|| {
            HarvesterError::Shape(format!("{ENTRY_TAG} is not an element"))
        })?;

        let bic = required_attribute(entry, BIC_ATTRIBUTE, ENTRY_TAG)?;
        let info = entry
            .children
            .get(PARTICIPANT_INFO_TAG)
            .and_then(XmlValue::as_element)
            .ok_or_else(|| {
                HarvesterError::Shape(format!(
                    "{ENTRY_TAG} {bic} has no {PARTICIPANT_INFO_TAG} element"
                ))
            })?;
        let name = required_attribute(info, NAME_ATTRIBUTE, PARTICIPANT_INFO_TAG)?;

        // Entries without correspondent accounts are common and expected.
        let Some(accounts) = entry.children.get(ACCOUNTS_TAG) else {
            continue;
        };

        for account in accounts.values() {
            let account = account.as_element().ok_or_else(|| {
                HarvesterError::Shape(format!("{ACCOUNTS_TAG} under {ENTRY_TAG} {bic} is not an element"))
            })?;
            let corr_account = required_attribute(account, ACCOUNT_ATTRIBUTE, ACCOUNTS_TAG)?;

            records.push(OutputRecord {
                bic: bic.clone(),
                name: name.clone(),
                corr_account,
            });
        }
    }

    Ok(records)
}

/// Select the single meaningful top-level key, skipping pseudo-roots.
fn find_document_root(tree: &ParsedTree) -> Result<&XmlElement> {
    let mut candidates = tree
        .iter()
        .filter(|(key, _)| !PSEUDO_ROOT_NAMES.contains(&key.as_str()));

    let (key, value) = candidates
        .next()
        .ok_or_else(|| HarvesterError::Shape("document has no content root".to_string()))?;

    if candidates.next().is_some() {
        return Err(HarvesterError::Shape(
            "document has more than one candidate root".to_string(),
        ));
    }

    value.as_element().ok_or_else(|| {
        HarvesterError::Shape(format!("document root <{key}> has no child elements"))
    })
}

fn required_attribute(element: &XmlElement, attribute: &str, context: &str) -> Result<String> {
    element.attributes.get(attribute).cloned().ok_or_else(|| {
        HarvesterError::Shape(format!(
            "missing required attribute {attribute} on {context}"
        ))
    })
}
