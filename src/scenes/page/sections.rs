use std::{fmt, str::FromStr};

use bevy::prelude::*;
use enum_map::{enum_map, Enum, EnumMap};

use crate::systems::ui::window::{templates::DesktopError, DesktopArea};

#[derive(Enum, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionId {
    Cover,
    Profile,
    Expertise,
    Connect,
}

impl SectionId {
    pub const ALL: [SectionId; 4] = [
        SectionId::Cover,
        SectionId::Profile,
        SectionId::Expertise,
        SectionId::Connect,
    ];

    pub const fn anchor(self) -> &'static str {
        match self {
            Self::Cover => "cover",
            Self::Profile => "profile",
            Self::Expertise => "expertise",
            Self::Connect => "connect",
        }
    }

    pub const fn chapter_number(self) -> &'static str {
        match self {
            Self::Cover => "00",
            Self::Profile => "01",
            Self::Expertise => "02",
            Self::Connect => "03",
        }
    }

    pub const fn toc_label(self) -> &'static str {
        match self {
            Self::Cover => "00 Cover",
            Self::Profile => "01 Profile",
            Self::Expertise => "02 Expertise",
            Self::Connect => "03 Connect",
        }
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.anchor())
    }
}

/// Accepts both `expertise` and link-style `#expertise`.
impl FromStr for SectionId {
    type Err = DesktopError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let anchor = value.strip_prefix('#').unwrap_or(value);
        Self::ALL
            .into_iter()
            .find(|section| section.anchor() == anchor)
            .ok_or_else(|| DesktopError::UnknownSection(value.to_string()))
    }
}

/// Vertical extent on the page, `y` growing downwards from the page top.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageSpan {
    pub top: f32,
    pub height: f32,
}

impl PageSpan {
    pub const fn new(top: f32, height: f32) -> Self {
        Self { top, height }
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }
}

#[derive(Resource, Clone, Debug)]
pub struct PageLayout {
    pub width: f32,
    spans: EnumMap<SectionId, PageSpan>,
}

impl Default for PageLayout {
    fn default() -> Self {
        Self::from_heights(enum_map! {
            SectionId::Cover => 720.0,
            SectionId::Profile => 760.0,
            SectionId::Expertise => 1160.0,
            SectionId::Connect => 560.0,
        })
    }
}

impl PageLayout {
    pub const WIDTH: f32 = 1100.0;
    pub const EXPERTISE_ITEMS_TOP: f32 = 100.0;
    pub const DESKTOP_TOP: f32 = 290.0;
    pub const DESKTOP_SIZE: Vec2 = Vec2::new(1000.0, 560.0);
    pub const DEFRAG_TOP: f32 = 880.0;

    pub fn from_heights(heights: EnumMap<SectionId, f32>) -> Self {
        let mut top = 0.0;
        let spans = EnumMap::from_fn(|section: SectionId| {
            let span = PageSpan::new(top, heights[section]);
            top += heights[section];
            span
        });
        Self {
            width: Self::WIDTH,
            spans,
        }
    }

    pub fn span(&self, section: SectionId) -> PageSpan {
        self.spans[section]
    }

    pub fn total_height(&self) -> f32 {
        self.spans[SectionId::Connect].bottom()
    }

    /// Page coordinates (`y` down, `x` from the left edge) to world space.
    pub fn to_world(&self, page: Vec2) -> Vec2 {
        Vec2::new(page.x - self.width * 0.5, -page.y)
    }

    /// Point inside `section`, measured from its top-left corner.
    pub fn in_section(&self, section: SectionId, offset: Vec2) -> Vec2 {
        self.to_world(Vec2::new(offset.x, self.span(section).top + offset.y))
    }

    pub fn desktop_area(&self) -> DesktopArea {
        let left = (self.width - Self::DESKTOP_SIZE.x) * 0.5;
        DesktopArea {
            origin: self.in_section(SectionId::Expertise, Vec2::new(left, Self::DESKTOP_TOP)),
            size: Self::DESKTOP_SIZE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sections_stack_without_gaps() {
        let layout = PageLayout::default();
        let mut expected_top = 0.0;
        for section in SectionId::ALL {
            assert_eq!(layout.span(section).top, expected_top);
            expected_top = layout.span(section).bottom();
        }
        assert_eq!(layout.total_height(), expected_top);
    }

    #[test]
    fn anchors_parse_with_or_without_hash() {
        assert_eq!("#connect".parse::<SectionId>(), Ok(SectionId::Connect));
        assert_eq!("profile".parse::<SectionId>(), Ok(SectionId::Profile));
        assert!(matches!(
            "#footer".parse::<SectionId>(),
            Err(DesktopError::UnknownSection(_))
        ));
    }

    #[test]
    fn desktop_sits_inside_the_expertise_section() {
        let layout = PageLayout::default();
        let area = layout.desktop_area();
        let expertise = layout.span(SectionId::Expertise);
        assert!(-area.origin.y > expertise.top);
        assert!(-area.origin.y + area.size.y < expertise.bottom());
        assert_eq!(area.origin.x, -area.size.x * 0.5);
    }
}
