//! The per-block controller.
//!
//! An [`Instance`] owns one macro block's source, its options, the last
//! diagram it displayed and the handles of the subtree it built around the
//! block:
//!
//! ```text
//! div.railroad_wrapper
//!   <the original block>
//!   div.railroad_modal ...
//!   div.railroad_container
//!     <inline visual>
//!     div.railroad_icons
//!       div > img.railroad_icon (options) + div.railroad_dropdown_content
//!       img.railroad_icon (fullscreen)
//! ```

use tracing::{debug, warn};

use crate::assets::{Asset, AssetConfig};
use crate::dom::{Document, DomError, EventKind, Listener, NodeId};
use crate::modal::Modal;
use crate::options::{DiagramOptions, OptionKey};
use crate::panel::{ICON_CLASS, OptionsPanel};
use crate::render::{Diagram, DiagramRenderer, RenderFailure};

const WRAPPER_CLASS: &str = "railroad_wrapper";
const CONTAINER_CLASS: &str = "railroad_container";
const ICONS_CLASS: &str = "railroad_icons";

/// What a listener asks its instance to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    OpenModal,
    CloseModal,
    TogglePanel,
    /// The new value is read from the checkbox that fired the event.
    SetOption(OptionKey),
}

/// A [`Command`] addressed to the instance at `instance` in discovery order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Action {
    pub instance: usize,
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Uninitialized,
    Rendering,
    Rendered,
    Failed,
}

/// A macro source block as found in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacroBlock {
    pub index: usize,
    pub source: String,
    pub node: NodeId,
}

#[derive(Debug)]
pub struct Instance {
    block: MacroBlock,
    options: DiagramOptions,
    phase: Phase,
    diagram: Option<Diagram>,
    last_error: Option<RenderFailure>,
    wrapper: NodeId,
    container: NodeId,
    visual: NodeId,
    fullscreen_icon: NodeId,
    modal: Modal,
    panel: OptionsPanel,
}

impl Instance {
    /// Wraps the block in the instance subtree and renders it for the first time.
    ///
    /// The block stays in the document: the wrapper takes its place and the
    /// block is moved into the wrapper.
    pub fn mount<R: DiagramRenderer>(
        doc: &mut Document,
        block: MacroBlock,
        parent: NodeId,
        assets: &AssetConfig,
        renderer: &R,
    ) -> Result<Self, DomError> {
        let index = block.index;
        let options = DiagramOptions::default();

        let wrapper = doc.create_element("div");
        doc.set_attribute(wrapper, "class", WRAPPER_CLASS)?;
        doc.set_attribute(wrapper, "style", "width: 100%")?;
        doc.insert_before(parent, wrapper, block.node)?;
        doc.append_child(wrapper, block.node);

        let modal = Modal::build(doc, index)?;
        doc.append_child(wrapper, modal.root());

        let container = doc.create_element("div");
        doc.set_attribute(container, "class", CONTAINER_CLASS)?;
        let visual = doc.create_element("svg");
        doc.append_child(container, visual);
        doc.append_child(wrapper, container);

        let icons = doc.create_element("div");
        doc.set_attribute(icons, "class", ICONS_CLASS)?;

        let panel = OptionsPanel::build(doc, index, &options, &assets.url(Asset::Options))?;
        doc.append_child(icons, panel.root());

        let fullscreen_icon = doc.create_element("img");
        doc.set_attribute(fullscreen_icon, "class", ICON_CLASS)?;
        doc.set_attribute(fullscreen_icon, "src", &assets.url(Asset::Fullscreen))?;
        doc.set_attribute(fullscreen_icon, "alt", "Show fullscreen")?;
        doc.add_listener(
            fullscreen_icon,
            Listener::bubbling(
                EventKind::Click,
                Action {
                    instance: index,
                    command: Command::OpenModal,
                },
            ),
        );
        doc.append_child(icons, fullscreen_icon);
        doc.append_child(container, icons);

        let mut instance = Self {
            block,
            options,
            phase: Phase::Uninitialized,
            diagram: None,
            last_error: None,
            wrapper,
            container,
            visual,
            fullscreen_icon,
            modal,
            panel,
        };
        instance.render(doc, renderer);
        Ok(instance)
    }

    /// Asks the renderer for a diagram of the current source and options.
    ///
    /// On success the inline view gets a copy of the new visual and the modal
    /// the visual itself. On failure nothing in the document changes; the
    /// failure is logged and kept as [`Instance::last_error`].
    pub fn render<R: DiagramRenderer>(&mut self, doc: &mut Document, renderer: &R) {
        self.phase = Phase::Rendering;
        debug!(
            block = self.block.index,
            flags = ?self.options.flags(),
            "rendering macro diagram"
        );

        let outcome = renderer
            .render(&self.block.source, &self.options)
            .and_then(|diagram| self.display(doc, diagram));

        match outcome {
            Ok(()) => {
                self.phase = Phase::Rendered;
                self.last_error = None;
            }
            Err(failure) => {
                warn!(block = self.block.index, error = %failure, "failed to render macro diagram");
                self.phase = Phase::Failed;
                self.last_error = Some(failure);
            }
        }
    }

    fn display(&mut self, doc: &mut Document, diagram: Diagram) -> Result<(), RenderFailure> {
        let modal_visual = doc.parse_fragment(&diagram.svg)?;
        let inline_visual = doc.clone_subtree(modal_visual);

        doc.replace_child(self.container, inline_visual, self.visual)?;
        doc.remove_subtree(self.visual);
        self.visual = inline_visual;
        doc.set_style_property(self.container, "width", &format!("{}px", diagram.width))?;
        self.modal.replace_visual(doc, modal_visual)?;

        self.diagram = Some(diagram);
        Ok(())
    }

    /// Changes exactly one option and re-renders.
    pub fn set_option<R: DiagramRenderer>(
        &mut self,
        doc: &mut Document,
        renderer: &R,
        key: OptionKey,
        value: bool,
    ) -> Result<(), DomError> {
        self.options.set(key, value);
        self.panel.sync(doc, key, value)?;
        self.render(doc, renderer);
        Ok(())
    }

    pub fn open_modal(&mut self, doc: &mut Document) -> Result<(), DomError> {
        self.modal.open(doc)
    }

    pub fn close_modal(&mut self, doc: &mut Document) -> Result<(), DomError> {
        self.modal.close(doc)
    }

    pub fn toggle_panel(&mut self, doc: &mut Document) -> Result<(), DomError> {
        self.panel.toggle(doc)
    }

    /// Runs a command delivered by an event whose target was `target`.
    pub fn handle<R: DiagramRenderer>(
        &mut self,
        doc: &mut Document,
        renderer: &R,
        command: Command,
        target: NodeId,
    ) -> Result<(), DomError> {
        match command {
            Command::OpenModal => self.open_modal(doc),
            Command::CloseModal => self.close_modal(doc),
            Command::TogglePanel => self.toggle_panel(doc),
            Command::SetOption(key) => {
                let value = doc.is_checked(target);
                self.set_option(doc, renderer, key, value)
            }
        }
    }

    pub fn index(&self) -> usize {
        self.block.index
    }

    pub fn block(&self) -> &MacroBlock {
        &self.block
    }

    pub fn source(&self) -> &str {
        &self.block.source
    }

    pub fn options(&self) -> &DiagramOptions {
        &self.options
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The diagram currently on display, if any render has succeeded yet.
    pub fn diagram(&self) -> Option<&Diagram> {
        self.diagram.as_ref()
    }

    pub fn last_error(&self) -> Option<&RenderFailure> {
        self.last_error.as_ref()
    }

    pub fn modal_visible(&self) -> bool {
        self.modal.is_visible()
    }

    pub fn modal(&self) -> &Modal {
        &self.modal
    }

    pub fn panel(&self) -> &OptionsPanel {
        &self.panel
    }

    pub fn wrapper(&self) -> NodeId {
        self.wrapper
    }

    pub fn container(&self) -> NodeId {
        self.container
    }

    pub fn inline_visual(&self) -> NodeId {
        self.visual
    }

    pub fn modal_visual(&self) -> NodeId {
        self.modal.visual()
    }

    pub fn fullscreen_icon(&self) -> NodeId {
        self.fullscreen_icon
    }
}
