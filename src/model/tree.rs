//! In-memory layer tree.
//!
//! An [`Artwork`] is a forest of [`OutputNode`] roots. Only outputs and image
//! layers own children; shadow, mask and frame nodes are leaves. The tree is
//! immutable once built: concrete pixel sizes discovered while compositing
//! are returned by the engine alongside rendered images, never written back.

use std::fmt;

/// One of the four caller-supplied source images.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKey {
    Cover,
    Screenshot,
    Wheel,
    Marquee,
}

impl ResourceKey {
    pub const ALL: [ResourceKey; 4] = [
        ResourceKey::Cover,
        ResourceKey::Screenshot,
        ResourceKey::Wheel,
        ResourceKey::Marquee,
    ];

    /// Exact, case-sensitive match against the semantic names.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "cover" => Some(Self::Cover),
            "screenshot" => Some(Self::Screenshot),
            "wheel" => Some(Self::Wheel),
            "marquee" => Some(Self::Marquee),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cover => "cover",
            Self::Screenshot => "screenshot",
            Self::Wheel => "wheel",
            Self::Marquee => "marquee",
        }
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Image source of a layer: a named source image or a file under the asset dir.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resource {
    Named(ResourceKey),
    File(String),
}

impl Resource {
    pub fn parse(s: &str) -> Self {
        match ResourceKey::parse(s) {
            Some(key) => Self::Named(key),
            None => Self::File(s.to_string()),
        }
    }
}

/// Declared target size. `None` on an axis is the `-1` "unspecified" sentinel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DeclaredSize {
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl DeclaredSize {
    pub const UNSPECIFIED: DeclaredSize = DeclaredSize {
        width: None,
        height: None,
    };

    pub fn new(width: Option<u32>, height: Option<u32>) -> Self {
        Self { width, height }
    }

    pub fn exact(width: u32, height: u32) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum VAlign {
    #[default]
    Top,
    Middle,
    Bottom,
}

/// Parsed layer description: one tree per output.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Artwork {
    pub outputs: Vec<OutputNode>,
}

impl Artwork {
    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }
}

/// Root of one composite. `resource` is kept verbatim so unknown keys can be
/// reported; [`OutputNode::key`] resolves it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputNode {
    pub resource: String,
    pub size: DeclaredSize,
    pub children: Vec<LayerNode>,
}

impl OutputNode {
    pub fn key(&self) -> Option<ResourceKey> {
        ResourceKey::parse(&self.resource)
    }
}

/// Child of an output or image layer, in document order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LayerNode {
    Image(ImageLayer),
    Shadow(ShadowSpec),
    Mask(EffectImage),
    Frame(EffectImage),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageLayer {
    pub resource: Resource,
    pub size: DeclaredSize,
    pub align: Align,
    pub valign: VAlign,
    pub x: i32,
    pub y: i32,
    pub children: Vec<LayerNode>,
}

impl ImageLayer {
    pub fn new(resource: Resource) -> Self {
        Self {
            resource,
            size: DeclaredSize::UNSPECIFIED,
            align: Align::Left,
            valign: VAlign::Top,
            x: 0,
            y: 0,
            children: Vec::new(),
        }
    }
}

/// Drop shadow parameters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ShadowSpec {
    /// Offset of the shadow along both axes, in pixels.
    pub distance: i32,
    /// Blur radius in pixels.
    pub softness: u32,
    /// Shadow opacity, 0 (invisible) to 255 (solid black).
    pub opacity: u8,
}

/// Mask or frame artwork file with its declared size.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EffectImage {
    pub file: String,
    pub size: DeclaredSize,
}
