use crate::dom::{Document, DomError, EventKind, Listener, NodeId};
use crate::instance::{Action, Command};
use crate::options::{DiagramOptions, OptionKey};

const DROPDOWN_CLASS: &str = "railroad_dropdown_content";
const DROPDOWN_SHOW_CLASS: &str = "railroad_dropdown_show";
pub(crate) const ICON_CLASS: &str = "railroad_icon";

/// The options icon plus the dropdown of checkboxes it reveals.
///
/// Whether the dropdown is shown is presentational only; it never touches
/// the options or causes a render.
#[derive(Debug, Clone)]
pub struct OptionsPanel {
    root: NodeId,
    icon: NodeId,
    dropdown: NodeId,
    checkboxes: Vec<(OptionKey, NodeId)>,
    open: bool,
}

impl OptionsPanel {
    pub fn build(
        doc: &mut Document,
        instance: usize,
        options: &DiagramOptions,
        icon_url: &str,
    ) -> Result<Self, DomError> {
        let root = doc.create_element("div");
        doc.set_attribute(root, "style", "position: relative; display: inline")?;

        let dropdown = doc.create_element("div");
        doc.set_attribute(dropdown, "style", "position: absolute")?;
        doc.set_attribute(dropdown, "class", DROPDOWN_CLASS)?;

        let list = doc.create_element("ul");
        doc.set_attribute(list, "style", "list-style-type: none; padding: 0px; margin: 0px")?;

        let mut checkboxes = Vec::with_capacity(OptionKey::ALL.len());
        for key in OptionKey::ALL {
            let item = doc.create_element("li");
            let input = doc.create_element("input");
            let input_id = format!("railroad_{}{}", key.name(), instance);
            doc.set_attribute(input, "type", "checkbox")?;
            doc.set_attribute(input, "id", &input_id)?;
            doc.set_checked(input, options.get(key))?;
            doc.add_listener(
                input,
                Listener::bubbling(
                    EventKind::Change,
                    Action {
                        instance,
                        command: Command::SetOption(key),
                    },
                ),
            );
            doc.append_child(item, input);

            let label = doc.create_element("label");
            doc.set_attribute(label, "style", "padding-left: 8px")?;
            doc.set_attribute(label, "for", &input_id)?;
            let text = doc.create_text(key.label());
            doc.append_child(label, text);
            doc.append_child(item, label);

            doc.append_child(list, item);
            checkboxes.push((key, input));
        }
        doc.append_child(dropdown, list);

        let icon = doc.create_element("img");
        doc.set_attribute(icon, "class", ICON_CLASS)?;
        doc.set_attribute(icon, "style", "margin-right: 8px")?;
        doc.set_attribute(icon, "src", icon_url)?;
        doc.set_attribute(icon, "alt", "Diagram options")?;
        doc.add_listener(
            icon,
            Listener::bubbling(
                EventKind::Click,
                Action {
                    instance,
                    command: Command::TogglePanel,
                },
            ),
        );

        doc.append_child(root, icon);
        doc.append_child(root, dropdown);

        Ok(Self {
            root,
            icon,
            dropdown,
            checkboxes,
            open: false,
        })
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn icon(&self) -> NodeId {
        self.icon
    }

    pub fn dropdown(&self) -> NodeId {
        self.dropdown
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn checkbox(&self, key: OptionKey) -> Option<NodeId> {
        self.checkboxes
            .iter()
            .find(|(candidate, _)| *candidate == key)
            .map(|(_, node)| *node)
    }

    pub fn toggle(&mut self, doc: &mut Document) -> Result<(), DomError> {
        self.open = doc.toggle_class(self.dropdown, DROPDOWN_SHOW_CLASS)?;
        Ok(())
    }

    /// Mirrors an option value onto its checkbox.
    pub fn sync(&self, doc: &mut Document, key: OptionKey, value: bool) -> Result<(), DomError> {
        match self.checkbox(key) {
            Some(input) => doc.set_checked(input, value),
            None => Ok(()),
        }
    }
}
