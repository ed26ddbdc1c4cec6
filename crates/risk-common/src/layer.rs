//! Input layer kinds and their color schemes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Base color used for layers without a dedicated scheme.
pub const FALLBACK_BASE_COLOR: &str = "#0042A6";

/// The geospatial layers the pipeline knows how to color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerKind {
    Expansion,
    Flood,
    Landslide,
    Urban,
    Water,
}

impl LayerKind {
    pub const ALL: [LayerKind; 5] = [
        LayerKind::Expansion,
        LayerKind::Flood,
        LayerKind::Landslide,
        LayerKind::Urban,
        LayerKind::Water,
    ];

    /// Identifier used in file names and configuration.
    pub fn name(&self) -> &'static str {
        match self {
            LayerKind::Expansion => "expansion",
            LayerKind::Flood => "flood",
            LayerKind::Landslide => "landslide",
            LayerKind::Urban => "urban",
            LayerKind::Water => "water",
        }
    }

    /// Base color of the layer's light-base-dark gradient.
    pub fn base_color(&self) -> &'static str {
        match self {
            LayerKind::Expansion => "#0042A6", // Electric Blue
            LayerKind::Flood => "#E43700",     // Rocket Red
            LayerKind::Landslide => "#FF6B35", // Orange
            LayerKind::Urban => "#666666",     // Mid gray
            LayerKind::Water => "#0042A6",     // Electric Blue
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            LayerKind::Expansion => "Expansión Urbana",
            LayerKind::Flood => "Inundaciones",
            LayerKind::Landslide => "Deslizamientos",
            LayerKind::Urban => "Área Urbana",
            LayerKind::Water => "Cuerpos de Agua",
        }
    }

    pub fn color_name(&self) -> &'static str {
        match self {
            LayerKind::Expansion | LayerKind::Water => "Electric Blue",
            LayerKind::Flood => "Rocket Red",
            LayerKind::Landslide => "Orange",
            LayerKind::Urban => "Gris",
        }
    }
}

impl fmt::Display for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LayerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        LayerKind::ALL
            .into_iter()
            .find(|kind| kind.name() == lowered)
            .ok_or_else(|| format!("unknown layer kind: {}", s))
    }
}

/// Color scheme resolved for a named data layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayerScheme {
    Known(LayerKind),
    /// Unrecognized layer name; rendered with the fallback base color.
    Fallback(String),
}

impl LayerScheme {
    /// Resolve a data-type name (typically a file stem) to a scheme.
    pub fn resolve(name: &str) -> Self {
        match name.parse::<LayerKind>() {
            Ok(kind) => LayerScheme::Known(kind),
            Err(_) => LayerScheme::Fallback(name.trim().to_lowercase()),
        }
    }

    pub fn data_type(&self) -> &str {
        match self {
            LayerScheme::Known(kind) => kind.name(),
            LayerScheme::Fallback(name) => name,
        }
    }

    pub fn base_color(&self) -> &'static str {
        match self {
            LayerScheme::Known(kind) => kind.base_color(),
            LayerScheme::Fallback(_) => FALLBACK_BASE_COLOR,
        }
    }

    pub fn title(&self) -> String {
        match self {
            LayerScheme::Known(kind) => kind.title().to_string(),
            LayerScheme::Fallback(name) => format!("Datos {}", name),
        }
    }

    /// Free-text description of the gradient, as shown in summaries.
    pub fn description(&self) -> String {
        match self {
            LayerScheme::Known(kind) => {
                format!("Gradiente {}: claro → base → oscuro", kind.color_name())
            }
            LayerScheme::Fallback(_) => "Escala de colores por defecto".to_string(),
        }
    }
}
