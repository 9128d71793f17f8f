//! View contract handed to whatever renders the widget.

use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, ConfigResult, MoveType};
use crate::surface::{SurfaceHost, ZoomSurfaceController, ZoomSurfaceStyle};

pub const CLOSE_BUTTON_LABEL: &str = "Zoom Out";

/// `<source>` entry for a `<picture>` base image.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PictureSource {
    pub src_set: String,
    pub media: Option<String>,
    pub sizes: Option<String>,
    #[serde(rename = "type")]
    pub mime_type: Option<String>,
}

/// Image related inputs of the widget.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageSources {
    pub src: String,
    pub src_set: Option<String>,
    pub sizes: Option<String>,
    pub sources: Vec<PictureSource>,
    pub zoom_src: Option<String>,
    pub alt: Option<String>,
    pub class_name: Option<String>,
}

impl ImageSources {
    pub fn new(src: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.src.trim().is_empty() {
            return Err(ConfigError::MissingSource);
        }
        Ok(())
    }

    pub fn zoom_src(&self) -> &str {
        self.zoom_src
            .as_deref()
            .filter(|src| !src.is_empty())
            .unwrap_or(&self.src)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BaseImageView {
    pub src: String,
    pub src_set: Option<String>,
    pub sizes: Option<String>,
    pub sources: Vec<PictureSource>,
    pub alt: Option<String>,
    pub class: String,
    pub transition: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoomImageView {
    pub src: String,
    pub class: String,
    /// Rendered size after `zoom_scale`; unset until the image has loaded.
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub style: ZoomSurfaceStyle,
    /// Render inside a fullscreen overlay instead of the figure.
    pub fullscreen_portal: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CloseButtonView {
    pub class: String,
    pub aria_label: &'static str,
    pub transition: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FigureView {
    pub class: String,
    pub hint_visible: bool,
    pub base_image: BaseImageView,
    pub zoom_image: Option<ZoomImageView>,
    pub close_button: Option<CloseButtonView>,
}

impl FigureView {
    pub fn build<H: SurfaceHost>(
        controller: &ZoomSurfaceController<H>,
        sources: &ImageSources,
    ) -> Self {
        let machine = controller.machine();
        let fade_duration_ms = machine.config().fade_duration_ms;
        let zoomed = machine.is_zoomed();

        let mut class = String::from("iiz");
        if machine.move_type() == MoveType::Drag {
            class.push_str(" iiz--drag");
        }
        if let Some(extra) = sources.class_name.as_deref().filter(|c| !c.is_empty()) {
            class.push(' ');
            class.push_str(extra);
        }

        let zoom_size = machine.zoom_image_size();
        let zoom_image = controller.surface_mounted().then(|| ZoomImageView {
            src: sources.zoom_src().to_string(),
            class: modifier_class("iiz__zoom-img", "iiz__zoom-img--visible", zoomed),
            width: zoom_size.map(|size| size.width),
            height: zoom_size.map(|size| size.height),
            style: controller.style(),
            fullscreen_portal: machine.is_fullscreen(),
        });

        let close_button = controller
            .close_affordance_visible()
            .then(|| CloseButtonView {
                class: modifier_class("iiz__btn iiz__close", "iiz__close--visible", zoomed),
                aria_label: CLOSE_BUTTON_LABEL,
                transition: controller.transition().css(),
            });

        Self {
            class,
            hint_visible: !zoomed,
            base_image: BaseImageView {
                src: sources.src.clone(),
                src_set: sources.src_set.clone(),
                sizes: sources.sizes.clone(),
                sources: sources.sources.clone(),
                alt: sources.alt.clone(),
                class: modifier_class("iiz__img", "iiz__img--hidden", zoomed),
                transition: base_image_transition(fade_duration_ms, zoomed),
            },
            zoom_image,
            close_button,
        }
    }
}

/// The thumbnail hides only once the zoom image has faded in, and shows
/// immediately on the way back.
pub fn base_image_transition(fade_duration_ms: u64, zoomed: bool) -> String {
    let delay = if zoomed { fade_duration_ms } else { 0 };
    format!("linear 0ms opacity {delay}ms, linear 0ms visibility {delay}ms")
}

fn modifier_class(base: &str, modifier: &str, enabled: bool) -> String {
    if enabled {
        format!("{base} {modifier}")
    } else {
        base.to_string()
    }
}
