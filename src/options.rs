use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// The user-toggleable rendering settings of one diagram.
///
/// Every instance owns its own copy; nothing is shared or persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DiagramOptions {
    pub hide_internal: bool,
    pub keep_groups: bool,
    pub foldcommontails: bool,
    pub show_legend: bool,
}

impl Default for DiagramOptions {
    fn default() -> Self {
        Self {
            hide_internal: true,
            keep_groups: true,
            foldcommontails: true,
            show_legend: true,
        }
    }
}

impl DiagramOptions {
    pub fn get(&self, key: OptionKey) -> bool {
        match key {
            OptionKey::HideInternal => self.hide_internal,
            OptionKey::KeepGroups => self.keep_groups,
            OptionKey::FoldCommonTails => self.foldcommontails,
            OptionKey::ShowLegend => self.show_legend,
        }
    }

    pub fn set(&mut self, key: OptionKey, value: bool) {
        let field = match key {
            OptionKey::HideInternal => &mut self.hide_internal,
            OptionKey::KeepGroups => &mut self.keep_groups,
            OptionKey::FoldCommonTails => &mut self.foldcommontails,
            OptionKey::ShowLegend => &mut self.show_legend,
        };
        *field = value;
    }

    /// The four flags in the order the renderer takes them.
    pub fn flags(&self) -> [bool; 4] {
        OptionKey::ALL.map(|key| self.get(key))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionKey {
    HideInternal,
    KeepGroups,
    FoldCommonTails,
    ShowLegend,
}

impl OptionKey {
    /// Boundary order: hide_internal, keep_groups, foldcommontails, show_legend.
    pub const ALL: [OptionKey; 4] = [
        OptionKey::HideInternal,
        OptionKey::KeepGroups,
        OptionKey::FoldCommonTails,
        OptionKey::ShowLegend,
    ];

    pub fn name(self) -> &'static str {
        match self {
            OptionKey::HideInternal => "hide_internal",
            OptionKey::KeepGroups => "keep_groups",
            OptionKey::FoldCommonTails => "foldcommontails",
            OptionKey::ShowLegend => "show_legend",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            OptionKey::HideInternal => "Hide macro-internal rules",
            OptionKey::KeepGroups => "Keep groups bound",
            OptionKey::FoldCommonTails => "Fold common sections",
            OptionKey::ShowLegend => "Generate legend",
        }
    }
}

impl fmt::Display for OptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OptionKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OptionKey::ALL
            .into_iter()
            .find(|key| key.name() == s)
            .ok_or_else(|| Error::UnknownOption(s.to_string()))
    }
}

/// A scripted option change, written `INDEX:OPTION=BOOL` (e.g. `0:show_legend=false`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionToggle {
    pub instance: usize,
    pub key: OptionKey,
    pub value: bool,
}

impl FromStr for OptionToggle {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidToggle(s.to_string());
        let (instance, rest) = s.split_once(':').ok_or_else(invalid)?;
        let (key, value) = rest.split_once('=').ok_or_else(invalid)?;
        Ok(Self {
            instance: instance.trim().parse().map_err(|_| invalid())?,
            key: key.trim().parse()?,
            value: value.trim().parse().map_err(|_| invalid())?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn defaults_are_all_enabled() {
        assert_eq!(DiagramOptions::default().flags(), [true; 4]);
    }

    #[test]
    fn names_round_trip_through_from_str() {
        for key in OptionKey::ALL {
            assert_eq!(key.name().parse::<OptionKey>().unwrap(), key);
        }
        assert!(matches!(
            "fold_common_tails".parse::<OptionKey>(),
            Err(Error::UnknownOption(name)) if name == "fold_common_tails"
        ));
    }

    #[test]
    fn parses_toggles() {
        assert_eq!(
            "1:show_legend=false".parse::<OptionToggle>().unwrap(),
            OptionToggle {
                instance: 1,
                key: OptionKey::ShowLegend,
                value: false,
            }
        );
        assert!(matches!(
            "show_legend=false".parse::<OptionToggle>(),
            Err(Error::InvalidToggle(_))
        ));
        assert!(matches!(
            "0:legend=false".parse::<OptionToggle>(),
            Err(Error::UnknownOption(_))
        ));
        assert!(matches!(
            "0:show_legend=no".parse::<OptionToggle>(),
            Err(Error::InvalidToggle(_))
        ));
    }

    fn any_key() -> impl Strategy<Value = OptionKey> {
        prop::sample::select(OptionKey::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn set_touches_only_the_named_field(
            start in any::<[bool; 4]>(),
            key in any_key(),
            value in any::<bool>(),
        ) {
            let mut options = DiagramOptions {
                hide_internal: start[0],
                keep_groups: start[1],
                foldcommontails: start[2],
                show_legend: start[3],
            };
            let before = options.flags();
            options.set(key, value);
            let after = options.flags();

            for (i, other) in OptionKey::ALL.into_iter().enumerate() {
                if other == key {
                    prop_assert_eq!(after[i], value);
                } else {
                    prop_assert_eq!(after[i], before[i]);
                }
            }
        }
    }
}
