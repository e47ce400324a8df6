//! Composition plan: an engine-independent description of all render
//! operations for one output video.
//!
//! The plan is a DAG expressed as a topologically ordered operation list;
//! every operation's inputs reference earlier output labels or original
//! input streams. Planning is decoupled from FFmpeg syntax: the emitter
//! builds [`FilterOp`] values, and [`CompositionPlan::to_filter_complex`]
//! serializes them for the compositor in one place.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::captions::CaptionChunk;
use crate::error::{MediaError, MediaResult};
use crate::layers::Layer;
use crate::overlay::TextOverlay;

/// Supported composition operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OpKind {
    Crop,
    Scale,
    Overlay,
    BoxBlur,
    DrawText,
    VolumeAdjust,
    AudioMerge,
}

impl OpKind {
    /// FFmpeg filter name.
    pub fn filter_name(&self) -> &'static str {
        match self {
            Self::Crop => "crop",
            Self::Scale => "scale",
            Self::Overlay => "overlay",
            Self::BoxBlur => "boxblur",
            Self::DrawText => "drawtext",
            Self::VolumeAdjust => "volume",
            Self::AudioMerge => "amerge",
        }
    }
}

/// One node of the composition graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterOp {
    pub op: OpKind,
    /// Stream labels consumed, in filter argument order
    pub inputs: Vec<String>,
    /// Label produced for downstream operations
    pub output: String,
    /// Operation parameters in canonical order
    pub params: Vec<(String, String)>,
}

impl FilterOp {
    /// Centered crop parameters: width, height, x, y.
    pub fn crop(input: impl Into<String>, output: impl Into<String>, w: u32, h: u32, x: u32, y: u32) -> Self {
        Self {
            op: OpKind::Crop,
            inputs: vec![input.into()],
            output: output.into(),
            params: param_list(&[("w", w.to_string()), ("h", h.to_string()), ("x", x.to_string()), ("y", y.to_string())]),
        }
    }

    /// Scale to exact dimensions.
    pub fn scale(input: impl Into<String>, output: impl Into<String>, w: u32, h: u32) -> Self {
        Self {
            op: OpKind::Scale,
            inputs: vec![input.into()],
            output: output.into(),
            params: param_list(&[("w", w.to_string()), ("h", h.to_string())]),
        }
    }

    /// Composite `top` over `base` at the given canvas position.
    pub fn overlay(
        base: impl Into<String>,
        top: impl Into<String>,
        output: impl Into<String>,
        x: i64,
        y: i64,
    ) -> Self {
        Self {
            op: OpKind::Overlay,
            inputs: vec![base.into(), top.into()],
            output: output.into(),
            params: param_list(&[("x", x.to_string()), ("y", y.to_string())]),
        }
    }

    /// Box blur with the given radius and a single pass.
    pub fn boxblur(input: impl Into<String>, output: impl Into<String>, radius: u32) -> Self {
        Self {
            op: OpKind::BoxBlur,
            inputs: vec![input.into()],
            output: output.into(),
            params: param_list(&[("radius", radius.to_string()), ("power", "1".to_string())]),
        }
    }

    /// Text draw with parameters in drawtext key order.
    pub fn drawtext(
        input: impl Into<String>,
        output: impl Into<String>,
        params: Vec<(String, String)>,
    ) -> Self {
        Self {
            op: OpKind::DrawText,
            inputs: vec![input.into()],
            output: output.into(),
            params,
        }
    }

    /// Audio volume adjustment.
    pub fn volume(input: impl Into<String>, output: impl Into<String>, factor: f64) -> Self {
        Self {
            op: OpKind::VolumeAdjust,
            inputs: vec![input.into()],
            output: output.into(),
            params: param_list(&[("volume", format!("{factor:.1}"))]),
        }
    }

    /// Merge audio streams into one.
    pub fn amerge(inputs: Vec<String>, output: impl Into<String>) -> Self {
        let count = inputs.len();
        Self {
            op: OpKind::AudioMerge,
            inputs,
            output: output.into(),
            params: param_list(&[("inputs", count.to_string())]),
        }
    }

    /// Render the filter with its arguments, without stream labels.
    ///
    /// Used both for `-filter_complex` serialization and for plain `-vf`
    /// chains built from Crop/Scale operations.
    pub fn render_filter(&self) -> String {
        let args = match self.op {
            // Positional argument filters
            OpKind::Crop | OpKind::Scale | OpKind::Overlay | OpKind::BoxBlur => {
                self.params
                    .iter()
                    .map(|(_, v)| v.as_str())
                    .collect::<Vec<_>>()
                    .join(":")
            }
            OpKind::VolumeAdjust => self.params[0].1.clone(),
            OpKind::AudioMerge => format!("inputs={}", self.params[0].1),
            OpKind::DrawText => self
                .params
                .iter()
                .map(|(k, v)| match k.as_str() {
                    "text" => format!("text='{}'", escape_drawtext(v)),
                    "enable" => format!("enable='{v}'"),
                    _ => format!("{k}={v}"),
                })
                .collect::<Vec<_>>()
                .join(":"),
        };
        format!("{}={}", self.op.filter_name(), args)
    }
}

fn param_list(pairs: &[(&str, String)]) -> Vec<(String, String)> {
    pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
}

/// Escape text for a single-quoted drawtext value.
fn escape_drawtext(text: &str) -> String {
    text.replace('\'', "\\'")
}

/// How the output audio stream is produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AudioOut {
    /// Voiceover merged with the base audio; carries the merged label
    Merged(String),
    /// Base video's own audio mapped through unchanged; carries the
    /// (optional) stream specifier
    Passthrough(String),
}

/// Ordered operation list plus the designated output pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompositionPlan {
    pub ops: Vec<FilterOp>,
    /// Label of the final video stream
    pub video_out: String,
    /// Final audio stream selection
    pub audio_out: AudioOut,
}

impl CompositionPlan {
    /// Serialize the plan to an FFmpeg filter_complex string.
    pub fn to_filter_complex(&self) -> String {
        self.ops
            .iter()
            .map(|op| {
                let inputs: String = op.inputs.iter().map(|l| format!("[{l}]")).collect();
                format!("{}{}[{}]", inputs, op.render_filter(), op.output)
            })
            .collect::<Vec<_>>()
            .join(";")
    }

    /// Stream map arguments for the designated output pair.
    pub fn map_args(&self) -> Vec<String> {
        let mut args = vec!["-map".to_string(), format!("[{}]", self.video_out)];
        match &self.audio_out {
            AudioOut::Merged(label) => {
                args.push("-map".to_string());
                args.push(format!("[{label}]"));
                args.push("-ac".to_string());
                args.push("2".to_string());
            }
            AudioOut::Passthrough(spec) => {
                args.push("-map".to_string());
                args.push(spec.clone());
            }
        }
        args
    }
}

/// Voiceover mixing request for [`emit_plan`].
#[derive(Debug, Clone, Copy)]
pub struct VoiceoverMix {
    /// FFmpeg input index of the voiceover audio file
    pub input: usize,
    /// Gain applied before merging
    pub volume: f64,
}

/// Options for [`emit_plan`].
#[derive(Debug, Clone)]
pub struct PlanOptions {
    /// Box blur radius applied to the background layer
    pub blur_strength: u32,
    /// Voiceover stream to mix over the base audio, if any
    pub voiceover: Option<VoiceoverMix>,
}

impl Default for PlanOptions {
    fn default() -> Self {
        Self {
            blur_strength: 20,
            voiceover: None,
        }
    }
}

/// Emit the composition plan for an ordered layer stack, text overlays,
/// and caption chunks.
///
/// The graph is a linear chain: the background is blurred, every further
/// layer is overlaid onto the running result, then each overlay line and
/// caption chunk adds one drawtext node. Caption nodes are time-gated with
/// `enable='between(t,start,end)'` so they can share one screen region.
/// With a voiceover, the voice stream is gain-adjusted and merged with the
/// base audio; otherwise the base audio passes through untouched.
pub fn emit_plan(
    layers: &[Layer],
    overlays: &[TextOverlay],
    chunks: &[CaptionChunk],
    options: &PlanOptions,
) -> MediaResult<CompositionPlan> {
    let Some(background) = layers.first() else {
        return Err(MediaError::EmptyLayerStack);
    };

    // Caller-supplied labels are reserved up front so generated labels
    // cannot shadow them.
    let mut used: HashSet<String> = HashSet::new();
    for layer in layers {
        if let Some(label) = &layer.label {
            if !used.insert(label.clone()) {
                return Err(MediaError::LabelCollision(label.clone()));
            }
        }
    }

    let claim = |label: String, used: &mut HashSet<String>| -> MediaResult<String> {
        if !used.insert(label.clone()) {
            return Err(MediaError::LabelCollision(label));
        }
        Ok(label)
    };

    let mut ops = Vec::new();

    let bg_label = match &background.label {
        Some(label) => label.clone(),
        None => claim("bg".to_string(), &mut used)?,
    };
    ops.push(FilterOp::boxblur(
        format!("{}:v", background.input),
        bg_label.clone(),
        options.blur_strength,
    ));
    let mut last = bg_label;

    for (i, layer) in layers.iter().enumerate().skip(1) {
        let label = match &layer.label {
            Some(label) => label.clone(),
            None => claim(format!("ov{i}"), &mut used)?,
        };
        ops.push(FilterOp::overlay(
            last,
            format!("{}:v", layer.input),
            label.clone(),
            layer.x,
            layer.y,
        ));
        last = label;
    }

    let mut text_index = 0usize;
    for overlay in overlays {
        for line in &overlay.lines {
            let label = claim(format!("txt{text_index}"), &mut used)?;
            text_index += 1;

            let style = &overlay.style;
            let y = if overlay.anchor.y_nudge() != 0 {
                format!("h-{}+{}", line.bottom_offset, overlay.anchor.y_nudge())
            } else {
                format!("h-{}", line.bottom_offset)
            };
            let params = vec![
                ("text".to_string(), line.text.clone()),
                ("fontfile".to_string(), style.font_file.clone()),
                ("fontcolor".to_string(), style.color.clone()),
                ("fontsize".to_string(), style.font_size.to_string()),
                ("x".to_string(), format!("(w-text_w)/2+{}", style.x_nudge)),
                ("y".to_string(), y),
                ("borderw".to_string(), style.border_width.to_string()),
                ("bordercolor".to_string(), style.border_color.clone()),
            ];
            ops.push(FilterOp::drawtext(last, label.clone(), params));
            last = label;
        }
    }

    let caption_style = crate::overlay::OverlayStyle::caption();
    let caption_offset = crate::overlay::BOTTOM_BASE_OFFSET;
    for (i, chunk) in chunks.iter().enumerate() {
        let label = claim(format!("cap{i}"), &mut used)?;
        let params = vec![
            (
                "text".to_string(),
                format!("{}{}", chunk.text, crate::overlay::LINE_PADDING),
            ),
            (
                "enable".to_string(),
                format!("between(t,{:.3},{:.3})", chunk.start, chunk.end),
            ),
            ("fontfile".to_string(), caption_style.font_file.clone()),
            ("fontcolor".to_string(), caption_style.color.clone()),
            ("fontsize".to_string(), caption_style.font_size.to_string()),
            (
                "x".to_string(),
                format!("(w-text_w)/2+{}", caption_style.x_nudge),
            ),
            ("y".to_string(), format!("h-{caption_offset}")),
            ("borderw".to_string(), caption_style.border_width.to_string()),
            (
                "bordercolor".to_string(),
                caption_style.border_color.clone(),
            ),
        ];
        ops.push(FilterOp::drawtext(last, label.clone(), params));
        last = label;
    }

    let base_audio = format!("{}:a", background.input);
    let audio_out = match options.voiceover {
        Some(mix) => {
            let voice_label = claim("vo".to_string(), &mut used)?;
            ops.push(FilterOp::volume(
                format!("{}:a", mix.input),
                voice_label.clone(),
                mix.volume,
            ));
            let merged = claim("aout".to_string(), &mut used)?;
            ops.push(FilterOp::amerge(vec![base_audio, voice_label], merged.clone()));
            AudioOut::Merged(merged)
        }
        None => AudioOut::Passthrough(format!("{base_audio}?")),
    };

    Ok(CompositionPlan {
        ops,
        video_out: last,
        audio_out,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::captions::plan_captions;
    use crate::layers::{build_stack, Layer, LayerKind};
    use crate::overlay::{plan_overlay, Anchor, DEFAULT_LINE_SPACING, TOP_BASE_OFFSET};
    use shortgen_models::{CaptionSpan, Resolution};

    fn stack_with_facecam() -> Vec<Layer> {
        let canvas = Resolution::new(2160, 3840);
        build_stack(
            canvas,
            Some(Layer::new(LayerKind::Background, 0, canvas)),
            Some(Layer::new(LayerKind::Content, 1, Resolution::new(2160, 1460))),
            vec![Layer::new(LayerKind::Facecam, 2, Resolution::new(700, 840))],
        )
        .unwrap()
    }

    #[test]
    fn test_empty_stack_rejected() {
        let err = emit_plan(&[], &[], &[], &PlanOptions::default()).unwrap_err();
        assert!(matches!(err, MediaError::EmptyLayerStack));
    }

    #[test]
    fn test_linear_layer_chain() {
        let plan = emit_plan(&stack_with_facecam(), &[], &[], &PlanOptions::default()).unwrap();

        assert_eq!(plan.ops.len(), 3);
        assert_eq!(plan.ops[0].op, OpKind::BoxBlur);
        assert_eq!(plan.ops[1].op, OpKind::Overlay);
        assert_eq!(plan.ops[2].op, OpKind::Overlay);
        // Each overlay consumes the previous output.
        assert_eq!(plan.ops[1].inputs[0], plan.ops[0].output);
        assert_eq!(plan.ops[2].inputs[0], plan.ops[1].output);
        assert_eq!(plan.video_out, plan.ops[2].output);
        assert_eq!(plan.audio_out, AudioOut::Passthrough("0:a?".to_string()));
    }

    #[test]
    fn test_filter_complex_serialization() {
        let plan = emit_plan(&stack_with_facecam(), &[], &[], &PlanOptions::default()).unwrap();
        assert_eq!(
            plan.to_filter_complex(),
            "[0:v]boxblur=20:1[bg];[bg][1:v]overlay=0:1190[ov1];[ov1][2:v]overlay=730:0[ov2]"
        );
    }

    #[test]
    fn test_drawtext_ops_chained() {
        let overlay = plan_overlay(
            "Hello world this is a test",
            10,
            Anchor::Top,
            DEFAULT_LINE_SPACING,
            TOP_BASE_OFFSET,
        );
        let plan = emit_plan(
            &stack_with_facecam(),
            &[overlay],
            &[],
            &PlanOptions::default(),
        )
        .unwrap();

        let texts: Vec<&FilterOp> = plan
            .ops
            .iter()
            .filter(|op| op.op == OpKind::DrawText)
            .collect();
        assert_eq!(texts.len(), 3);
        assert_eq!(plan.video_out, "txt2");

        let rendered = texts[0].render_filter();
        assert!(rendered.contains("fontsize=190"));
        assert!(rendered.contains("y=h-3050+20"));
        assert!(rendered.contains("x=(w-text_w)/2+12"));
    }

    #[test]
    fn test_caption_ops_time_gated() {
        let spans = [CaptionSpan::new(2.0, 5.0, "one two three four five six")];
        let chunks = plan_captions(&spans, 3, 8.0);
        let plan = emit_plan(
            &stack_with_facecam(),
            &[],
            &chunks,
            &PlanOptions::default(),
        )
        .unwrap();

        let caps: Vec<String> = plan
            .ops
            .iter()
            .filter(|op| op.op == OpKind::DrawText)
            .map(|op| op.render_filter())
            .collect();
        assert_eq!(caps.len(), 2);
        assert!(caps[0].contains("enable='between(t,10.000,11.500)'"));
        assert!(caps[1].contains("enable='between(t,11.500,13.000)'"));
        assert!(caps[0].contains("y=h-930"));
    }

    #[test]
    fn test_voiceover_audio_merge() {
        let options = PlanOptions {
            blur_strength: 20,
            voiceover: Some(VoiceoverMix {
                input: 3,
                volume: 3.0,
            }),
        };
        let plan = emit_plan(&stack_with_facecam(), &[], &[], &options).unwrap();

        let tail: Vec<String> = plan
            .ops
            .iter()
            .rev()
            .take(2)
            .map(|op| op.render_filter())
            .collect();
        assert_eq!(tail[1], "volume=3.0");
        assert_eq!(tail[0], "amerge=inputs=2");
        assert_eq!(plan.audio_out, AudioOut::Merged("aout".to_string()));
        assert_eq!(
            plan.map_args(),
            vec!["-map", "[ov2]", "-map", "[aout]", "-ac", "2"]
        );
    }

    #[test]
    fn test_quote_escaping_in_drawtext() {
        let overlay = plan_overlay("it's here", 25, Anchor::Top, DEFAULT_LINE_SPACING, TOP_BASE_OFFSET);
        let plan = emit_plan(
            &stack_with_facecam(),
            &[overlay],
            &[],
            &PlanOptions::default(),
        )
        .unwrap();
        let rendered = plan.ops.last().unwrap().render_filter();
        assert!(rendered.contains("it\\'s"));
    }

    #[test]
    fn test_label_collision_detected() {
        let mut layers = stack_with_facecam();
        // A caller label that shadows a generated overlay label.
        layers[0].label = Some("ov1".to_string());
        let err = emit_plan(&layers, &[], &[], &PlanOptions::default()).unwrap_err();
        assert!(matches!(err, MediaError::LabelCollision(label) if label == "ov1"));
    }

    #[test]
    fn test_caller_labels_used_verbatim() {
        let mut layers = stack_with_facecam();
        layers[0].label = Some("blurred".to_string());
        let plan = emit_plan(&layers, &[], &[], &PlanOptions::default()).unwrap();
        assert_eq!(plan.ops[0].output, "blurred");
        assert_eq!(plan.ops[1].inputs[0], "blurred");
    }

    #[test]
    fn test_vf_chain_rendering() {
        let crop = FilterOp::crop("0:v", "c", 608, 1080, 656, 0);
        let scale = FilterOp::scale("c", "s", 2160, 3840);
        assert_eq!(crop.render_filter(), "crop=608:1080:656:0");
        assert_eq!(scale.render_filter(), "scale=2160:3840");
    }
}
