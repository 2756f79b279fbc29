use tracing::{debug, warn};

use crate::assets::AssetConfig;
use crate::dom::{Document, DomError, Selector};
use crate::instance::{Instance, MacroBlock};
use crate::modal::REVEAL_ON_STYLESHEET_LOAD;
use crate::render::DiagramRenderer;

/// Scans `doc` once and mounts one instance per matching block, in document order.
///
/// The discovery index of each block doubles as its instance index.
pub fn discover<R: DiagramRenderer>(
    doc: &mut Document,
    selector: &Selector,
    assets: &AssetConfig,
    renderer: &R,
) -> Result<Vec<Instance>, DomError> {
    let blocks = doc.query_selector_all(selector);
    debug!(%selector, count = blocks.len(), "discovered macro blocks");

    let mut instances = Vec::with_capacity(blocks.len());
    for node in blocks {
        let Some(parent) = doc.parent(node) else {
            warn!(%selector, "skipping macro block without a parent");
            continue;
        };
        let block = MacroBlock {
            index: instances.len(),
            source: doc.text_content(node),
            node,
        };
        instances.push(Instance::mount(doc, block, parent, assets, renderer)?);
    }
    Ok(instances)
}

/// Returns `true` if the `<meta name="generator">` directly under the
/// document's `<head>` names `generator`.
pub fn is_generated_by(doc: &Document, generator: &str) -> bool {
    let Some(head) = doc.query_selector(&Selector::new(Some("head"), None)) else {
        return false;
    };
    doc.children(head).iter().any(|&node| {
        doc.tag(node) == Some("meta")
            && doc.attribute(node, "name") == Some("generator")
            && doc.attribute(node, "content") == Some(generator)
    })
}

/// Links the stylesheet from `<head>`. Returns `false` if there is no `<head>`.
///
/// Once loaded, the link reveals modals hidden by
/// [`crate::modal::Modal::hide_until_styled`].
pub fn inject_stylesheet(doc: &mut Document, href: &str) -> Result<bool, DomError> {
    let Some(head) = doc.query_selector(&Selector::new(Some("head"), None)) else {
        return Ok(false);
    };
    let link = doc.create_element("link");
    doc.set_attribute(link, "type", "text/css")?;
    doc.set_attribute(link, "rel", "stylesheet")?;
    doc.set_attribute(link, "href", href)?;
    doc.set_attribute(link, "onload", REVEAL_ON_STYLESHEET_LOAD)?;
    doc.append_child(head, link);
    Ok(true)
}
