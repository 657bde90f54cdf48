//! Terminal rendering shared by commands.

use citeline_normalize::{Citation, Locator};

/// Render a sources block, or nothing when there are no citations.
pub fn sources_block(citations: &[Citation]) -> Option<String> {
    if citations.is_empty() {
        return None;
    }

    let lines: Vec<String> = citations
        .iter()
        .enumerate()
        .map(|(i, c)| {
            let mut line = format!(
                "  {}. {} (page {}, para {})",
                i + 1,
                c.source_file,
                c.page,
                c.paragraph
            );
            if let Some(ref excerpt) = c.text_excerpt {
                line.push_str(&format!("\n     \"{}\"", excerpt.trim()));
            }
            line
        })
        .collect();

    Some(format!("Sources:\n{}", lines.join("\n")))
}

/// Render the document locator a flat reply may carry.
pub fn document_line(
    filename: Option<&str>,
    page: Option<&Locator>,
    paragraph: Option<&Locator>,
) -> Option<String> {
    let filename = filename?;
    let mut line = format!("Document: {}", filename);

    if let Some(page) = page {
        line.push_str(&format!(", page {}", page));
    }
    if let Some(paragraph) = paragraph {
        line.push_str(&format!(", para {}", paragraph));
    }

    Some(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sources_block() {
        let block = sources_block(&[
            Citation::new("contract.pdf", 2, 1),
            Citation::new("act.pdf", 7, 3).with_excerpt(" Deposits are capped. "),
        ])
        .unwrap();

        assert_eq!(
            block,
            "Sources:\n  1. contract.pdf (page 2, para 1)\n  2. act.pdf (page 7, para 3)\n     \"Deposits are capped.\""
        );
    }

    #[test]
    fn test_sources_block_empty() {
        assert!(sources_block(&[]).is_none());
    }

    #[test]
    fn test_document_line() {
        let page = Locator::Text("iv".to_string());
        assert_eq!(
            document_line(Some("lease.pdf"), Some(&page), None).unwrap(),
            "Document: lease.pdf, page iv"
        );
        assert!(document_line(None, Some(&page), None).is_none());
    }
}
