//! Static window blueprints.
//!
//! Every window the desktop can show is described once here and stored in a
//! [`TemplateRegistry`] at startup. String keys coming from icons or links are
//! resolved through [`WindowTemplateId::from_str`], which rejects unknown keys
//! instead of silently producing nothing.
use std::{fmt, str::FromStr};

use bevy::prelude::*;
use enum_map::{enum_map, Enum, EnumMap};
use phf::phf_map;

use crate::systems::ui::tabs::TabEntry;

/// Base URL the icon file names are resolved against.
pub const ICON_BASE_URL: &str = "https://win98icons.alexmeub.com/icons/png/";

#[derive(Enum, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowTemplateId {
    Computer,
    Network,
    Documents,
    Recycle,
    ConnectHub,
    EmailClient,
}

static TEMPLATE_KEYS: phf::Map<&'static str, WindowTemplateId> = phf_map! {
    "computer" => WindowTemplateId::Computer,
    "network" => WindowTemplateId::Network,
    "documents" => WindowTemplateId::Documents,
    "recycle" => WindowTemplateId::Recycle,
    "connect-hub" => WindowTemplateId::ConnectHub,
    "email-client" => WindowTemplateId::EmailClient,
};

impl WindowTemplateId {
    pub const ALL: [WindowTemplateId; 6] = [
        WindowTemplateId::Computer,
        WindowTemplateId::Network,
        WindowTemplateId::Documents,
        WindowTemplateId::Recycle,
        WindowTemplateId::ConnectHub,
        WindowTemplateId::EmailClient,
    ];

    pub const fn key(self) -> &'static str {
        match self {
            Self::Computer => "computer",
            Self::Network => "network",
            Self::Documents => "documents",
            Self::Recycle => "recycle",
            Self::ConnectHub => "connect-hub",
            Self::EmailClient => "email-client",
        }
    }
}

impl FromStr for WindowTemplateId {
    type Err = DesktopError;

    fn from_str(key: &str) -> Result<Self, Self::Err> {
        TEMPLATE_KEYS
            .get(key)
            .copied()
            .ok_or_else(|| DesktopError::UnknownTemplate(key.to_string()))
    }
}

impl fmt::Display for WindowTemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DesktopError {
    UnknownTemplate(String),
    UnknownSection(String),
}

impl fmt::Display for DesktopError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownTemplate(key) => write!(f, "unknown window template `{key}`"),
            Self::UnknownSection(anchor) => write!(f, "unknown page section `{anchor}`"),
        }
    }
}

impl std::error::Error for DesktopError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowKind {
    /// Grey dialog chrome; owns a tab set.
    SysProp,
    Explorer,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Dimension {
    Px(f32),
    Auto,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListingEntry {
    pub icon: &'static str,
    pub label: &'static str,
    pub caption: Option<&'static str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TabPane {
    pub tab: &'static str,
    pub label: &'static str,
    pub pane: &'static str,
    pub lines: &'static [&'static str],
}

impl TabPane {
    pub const fn entry(&self) -> TabEntry {
        TabEntry {
            tab: self.tab,
            pane: self.pane,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchAction {
    /// Handed to the host; nothing is fetched here.
    OpenUrl(&'static str),
    OpenWindow(WindowTemplateId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Launcher {
    pub icon: &'static str,
    pub label: &'static str,
    pub action: LaunchAction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FooterAction {
    Close,
    Dial,
    Inert,
    Disabled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FooterButton {
    pub label: &'static str,
    pub action: FooterAction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowBody {
    Tabbed(&'static [TabPane]),
    Listing {
        heading: &'static str,
        entries: &'static [ListingEntry],
    },
    Files(&'static [ListingEntry]),
    Launchers {
        entries: &'static [Launcher],
        hint: &'static str,
    },
    DialUp,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowTemplate {
    pub title: &'static str,
    pub icon: &'static str,
    pub kind: WindowKind,
    pub width: Dimension,
    pub height: Dimension,
    pub body: WindowBody,
    pub footer: &'static [FooterButton],
    pub default_tab: Option<&'static str>,
}

impl WindowTemplate {
    pub fn icon_url(&self) -> String {
        format!("{ICON_BASE_URL}{}", self.icon)
    }

    pub fn tab_panes(&self) -> &'static [TabPane] {
        match self.body {
            WindowBody::Tabbed(panes) => panes,
            _ => &[],
        }
    }
}

const COMPUTER_PANES: &[TabPane] = &[
    TabPane {
        tab: "general",
        label: "General",
        pane: "general",
        lines: &[
            "System:",
            "    Francis Amante",
            "    Copyright (c) 2024",
            "",
            "Computer:",
            "    UofT Computer Science",
            "    Strategic Planning",
            "    Problem Solving",
        ],
    },
    TabPane {
        tab: "hardware",
        label: "Hardware",
        pane: "hardware",
        lines: &[
            "Network Adapters",
            "    Wireless Connectivity (IEEE 802.11)",
            "    MikroTik Routing Systems",
            "    Ubiquiti Networks Infrastructure",
            "System Devices",
            "    Hardware Refurbishment",
            "    System Administration",
            "    Network Diagnostics",
        ],
    },
    TabPane {
        tab: "performance",
        label: "Performance",
        pane: "performance",
        lines: &[
            "Graphics: Video Production",
            "    Premiere Pro, DaVinci Resolve",
            "Imaging Devices: Photography",
            "    Analog (Nikon EM) & Digital",
            "Documentation: Technical Writing",
            "    Visual Storytelling & Feasibility Studies",
        ],
    },
];

const COMPUTER_FOOTER: &[FooterButton] = &[
    FooterButton {
        label: "OK",
        action: FooterAction::Close,
    },
    FooterButton {
        label: "Cancel",
        action: FooterAction::Close,
    },
    FooterButton {
        label: "Apply",
        action: FooterAction::Disabled,
    },
];

const DIAL_UP_FOOTER: &[FooterButton] = &[
    FooterButton {
        label: "Dial",
        action: FooterAction::Dial,
    },
    FooterButton {
        label: "Cancel",
        action: FooterAction::Close,
    },
    FooterButton {
        label: "Properties",
        action: FooterAction::Inert,
    },
];

const NETWORK_ENTRIES: &[ListingEntry] = &[
    ListingEntry {
        icon: "network_connection-0.png",
        label: "Local ISP Infrastructure",
        caption: Some("Designed routing for remote towns."),
    },
    ListingEntry {
        icon: "network_connection-0.png",
        label: "Mesh Networks",
        caption: Some("Deployed Ubiquiti systems."),
    },
];

const DOCUMENT_ENTRIES: &[ListingEntry] = &[
    ListingEntry {
        icon: "video_-0.png",
        label: "Film_Project.mp4",
        caption: None,
    },
    ListingEntry {
        icon: "camera-2.png",
        label: "Photos.zip",
        caption: None,
    },
    ListingEntry {
        icon: "notepad-5.png",
        label: "Thesis.txt",
        caption: None,
    },
];

const RECYCLE_ENTRIES: &[ListingEntry] = &[
    ListingEntry {
        icon: "recycle_bin_empty-4.png",
        label: "Adobe Flash Player",
        caption: None,
    },
    ListingEntry {
        icon: "recycle_bin_empty-4.png",
        label: "Internet Explorer 6",
        caption: None,
    },
    ListingEntry {
        icon: "recycle_bin_empty-4.png",
        label: "My Myspace Page",
        caption: None,
    },
];

const CONNECT_LAUNCHERS: &[Launcher] = &[
    Launcher {
        icon: "users-1.png",
        label: "LinkedIn",
        action: LaunchAction::OpenUrl("https://www.linkedin.com/in/francis-amante"),
    },
    Launcher {
        icon: "script-0.png",
        label: "Resume",
        action: LaunchAction::OpenUrl("/resume.pdf"),
    },
    Launcher {
        icon: "outlook_express-5.png",
        label: "Email Me",
        action: LaunchAction::OpenWindow(WindowTemplateId::EmailClient),
    },
];

/// Immutable lookup from template id to blueprint.
#[derive(Resource, Clone)]
pub struct TemplateRegistry(EnumMap<WindowTemplateId, WindowTemplate>);

impl TemplateRegistry {
    pub fn get(&self, id: WindowTemplateId) -> &WindowTemplate {
        &self.0[id]
    }

    pub fn resolve(&self, key: &str) -> Result<(WindowTemplateId, &WindowTemplate), DesktopError> {
        let id = key.parse::<WindowTemplateId>()?;
        Ok((id, self.get(id)))
    }
}

impl Default for TemplateRegistry {
    fn default() -> Self {
        Self(enum_map! {
            WindowTemplateId::Computer => WindowTemplate {
                title: "System Properties",
                icon: "computer_explorer-4.png",
                kind: WindowKind::SysProp,
                width: Dimension::Px(600.0),
                height: Dimension::Px(450.0),
                body: WindowBody::Tabbed(COMPUTER_PANES),
                footer: COMPUTER_FOOTER,
                default_tab: Some("general"),
            },
            WindowTemplateId::Network => WindowTemplate {
                title: "Network Neighborhood",
                icon: "world-0.png",
                kind: WindowKind::Explorer,
                width: Dimension::Px(500.0),
                height: Dimension::Px(300.0),
                body: WindowBody::Listing {
                    heading: "Network Connections:",
                    entries: NETWORK_ENTRIES,
                },
                footer: &[],
                default_tab: None,
            },
            WindowTemplateId::Documents => WindowTemplate {
                title: "My Documents",
                icon: "directory_open_file_mydocs-4.png",
                kind: WindowKind::Explorer,
                width: Dimension::Px(500.0),
                height: Dimension::Px(300.0),
                body: WindowBody::Files(DOCUMENT_ENTRIES),
                footer: &[],
                default_tab: None,
            },
            WindowTemplateId::Recycle => WindowTemplate {
                title: "Recycle Bin",
                icon: "recycle_bin_empty-4.png",
                kind: WindowKind::Explorer,
                width: Dimension::Px(400.0),
                height: Dimension::Px(250.0),
                body: WindowBody::Listing {
                    heading: "Deleted Items:",
                    entries: RECYCLE_ENTRIES,
                },
                footer: &[],
                default_tab: None,
            },
            WindowTemplateId::ConnectHub => WindowTemplate {
                title: "Connect Protocol",
                icon: "modem-0.png",
                kind: WindowKind::Explorer,
                width: Dimension::Px(400.0),
                height: Dimension::Px(300.0),
                body: WindowBody::Launchers {
                    entries: CONNECT_LAUNCHERS,
                    hint: "Select a protocol to initiate connection.",
                },
                footer: &[],
                default_tab: None,
            },
            WindowTemplateId::EmailClient => WindowTemplate {
                title: "Dial-Up Connection",
                icon: "modem-4.png",
                kind: WindowKind::SysProp,
                width: Dimension::Px(450.0),
                height: Dimension::Auto,
                body: WindowBody::DialUp,
                footer: DIAL_UP_FOOTER,
                default_tab: None,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_key_parses_back_to_its_template() {
        for id in WindowTemplateId::ALL {
            assert_eq!(id.key().parse::<WindowTemplateId>(), Ok(id));
        }
    }

    #[test]
    fn unknown_key_is_rejected_with_the_offending_key() {
        assert_eq!(
            "printer".parse::<WindowTemplateId>(),
            Err(DesktopError::UnknownTemplate(String::from("printer")))
        );
        assert!(TemplateRegistry::default().resolve("").is_err());
    }

    #[test]
    fn computer_is_a_tabbed_system_dialog_defaulting_to_general() {
        let registry = TemplateRegistry::default();
        let computer = registry.get(WindowTemplateId::Computer);
        assert_eq!(computer.kind, WindowKind::SysProp);
        assert_eq!(computer.default_tab, Some("general"));
        let tabs: Vec<_> = computer.tab_panes().iter().map(|pane| pane.tab).collect();
        assert_eq!(tabs, vec!["general", "hardware", "performance"]);
    }

    #[test]
    fn email_client_reuses_dialog_chrome_without_tabs() {
        let registry = TemplateRegistry::default();
        let email = registry.get(WindowTemplateId::EmailClient);
        assert_eq!(email.kind, WindowKind::SysProp);
        assert_eq!(email.height, Dimension::Auto);
        assert!(email.tab_panes().is_empty());
        assert_eq!(
            email.icon_url(),
            "https://win98icons.alexmeub.com/icons/png/modem-4.png"
        );
    }
}
