use tracing::{debug, info, warn};

use crate::assets::Asset;
use crate::config::Config;
use crate::discovery::{discover, inject_stylesheet, is_generated_by};
use crate::dom::{Document, EventKind, NodeId};
use crate::error::{Error, Result};
use crate::instance::{Command, Instance};
use crate::options::OptionKey;
use crate::ready::Readiness;
use crate::render::DiagramRenderer;

/// A document together with the diagram instances mounted into it.
///
/// The embedder drives it: user input comes in through [`Page::click`] and
/// [`Page::set_checked`], and every resulting command runs to completion
/// before the call returns.
#[derive(Debug)]
pub struct Page<R> {
    document: Document,
    renderer: Option<R>,
    instances: Vec<Instance>,
}

impl<R: DiagramRenderer> Page<R> {
    /// Waits for the renderer, then decorates every macro block in `document`.
    ///
    /// If the readiness signal never fires the page keeps zero instances.
    pub async fn load(
        mut document: Document,
        config: &Config,
        readiness: Readiness<R>,
    ) -> Result<Self> {
        let selector = config.selector()?;

        let Some(renderer) = readiness.wait().await else {
            debug!("renderer never became ready; leaving document untouched");
            return Ok(Self {
                document,
                renderer: None,
                instances: Vec::new(),
            });
        };

        if let Some(generator) = &config.generator {
            if !is_generated_by(&document, generator) {
                debug!(%generator, "document is not generated by the expected generator");
                return Ok(Self {
                    document,
                    renderer: Some(renderer),
                    instances: Vec::new(),
                });
            }
        }

        if let Some(version) = renderer.version_info() {
            info!("{version}");
        }

        let styled = config.inject_stylesheet
            && inject_stylesheet(&mut document, &config.assets.url(Asset::Stylesheet))?;
        if config.inject_stylesheet && !styled {
            debug!("document has no <head>; stylesheet not linked");
        }

        let instances = discover(&mut document, &selector, &config.assets, &renderer)?;
        if styled {
            for instance in &instances {
                instance.modal().hide_until_styled(&mut document)?;
            }
        }
        Ok(Self {
            document,
            renderer: Some(renderer),
            instances,
        })
    }

    /// A pointer click on `target`.
    ///
    /// Clicking a checkbox flips it and fires its change event, as a browser would.
    pub fn click(&mut self, target: NodeId) -> Result<()> {
        self.dispatch(target, EventKind::Click)?;
        if self.document.is_checkbox(target) {
            let checked = !self.document.is_checked(target);
            self.set_checked(target, checked)?;
        }
        Ok(())
    }

    /// Sets a checkbox to `checked` and fires its change event.
    pub fn set_checked(&mut self, target: NodeId, checked: bool) -> Result<()> {
        self.document.set_checked(target, checked)?;
        self.dispatch(target, EventKind::Change)
    }

    /// Runs every action the event triggers; one failing action does not stop the rest.
    fn dispatch(&mut self, target: NodeId, kind: EventKind) -> Result<()> {
        let Some(renderer) = self.renderer.as_ref() else {
            return Ok(());
        };
        for action in self.document.dispatch(target, kind) {
            let Some(instance) = self.instances.get_mut(action.instance) else {
                warn!(instance = action.instance, "event routed to an unknown instance");
                continue;
            };
            if let Err(e) = instance.handle(&mut self.document, renderer, action.command, target) {
                warn!(
                    instance = action.instance,
                    command = ?action.command,
                    error = %e,
                    "failed to handle event"
                );
            }
        }
        Ok(())
    }

    /// Changes an option through the instance's checkbox, exactly like a user toggle.
    pub fn set_option(&mut self, instance: usize, key: OptionKey, value: bool) -> Result<()> {
        let checkbox = self
            .instance(instance)
            .and_then(|i| i.panel().checkbox(key))
            .ok_or(Error::NoSuchInstance(instance))?;
        self.set_checked(checkbox, value)
    }

    /// Opens an instance's modal through its fullscreen icon.
    pub fn open_modal(&mut self, instance: usize) -> Result<()> {
        let icon = self
            .instance(instance)
            .map(Instance::fullscreen_icon)
            .ok_or(Error::NoSuchInstance(instance))?;
        self.click(icon)
    }

    /// Routes a command straight to an instance, bypassing the document.
    ///
    /// With no checkbox to read from, `SetOption` flips the current value.
    pub fn command(&mut self, instance: usize, command: Command) -> Result<()> {
        let Some(renderer) = self.renderer.as_ref() else {
            return Ok(());
        };
        let target = self.document.root();
        let instance = self
            .instances
            .get_mut(instance)
            .ok_or(Error::NoSuchInstance(instance))?;
        match command {
            Command::SetOption(key) => {
                let value = !instance.options().get(key);
                instance.set_option(&mut self.document, renderer, key, value)?
            }
            other => instance.handle(&mut self.document, renderer, other, target)?,
        }
        Ok(())
    }
}

impl<R> Page<R> {
    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn renderer(&self) -> Option<&R> {
        self.renderer.as_ref()
    }

    pub fn instances(&self) -> &[Instance] {
        &self.instances
    }

    pub fn instance(&self, index: usize) -> Option<&Instance> {
        self.instances.get(index)
    }

    pub fn to_markup(&self) -> String {
        self.document.to_markup()
    }

    pub fn into_document(self) -> Document {
        self.document
    }
}
