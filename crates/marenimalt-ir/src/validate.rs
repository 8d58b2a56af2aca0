use marenimalt_core::MarenimaltError;

use crate::timeline::{ElementContent, Timeline};

/// Validate a lowered timeline before it is handed to a renderer.
pub fn validate_timeline(timeline: &Timeline) -> Result<(), Vec<MarenimaltError>> {
    let mut errors = Vec::new();
    let total = timeline.duration.as_seconds();

    if !total.is_finite() {
        errors.push(MarenimaltError::TimelineValidation(
            "timeline duration is not finite".into(),
        ));
    }

    let has_content = !timeline.elements.is_empty() || !timeline.audio.is_empty();
    if has_content && total <= 0.0 {
        errors.push(MarenimaltError::TimelineValidation(
            "timeline has elements but zero duration".into(),
        ));
    }

    for (i, span) in timeline.elements.iter().enumerate() {
        let (start, end) = (span.start.as_seconds(), span.end.as_seconds());
        if !start.is_finite() || !end.is_finite() {
            errors.push(MarenimaltError::TimelineValidation(format!(
                "element {} has a non-finite time range",
                i
            )));
            continue;
        }
        if end < start {
            errors.push(MarenimaltError::TimelineValidation(format!(
                "element {} ends before it starts",
                i
            )));
        }
        if end > total + 1e-9 {
            errors.push(MarenimaltError::TimelineValidation(format!(
                "element {} ends after the timeline ({:.3}s > {:.3}s)",
                i, end, total
            )));
        }
        match &span.content {
            ElementContent::Image { image, scale } => {
                if image.trim().is_empty() {
                    errors.push(MarenimaltError::TimelineValidation(format!(
                        "element {} has an empty image reference",
                        i
                    )));
                }
                if scale.is_nan() || *scale <= 0.0 {
                    errors.push(MarenimaltError::TimelineValidation(format!(
                        "element {} has non-positive image scale {}",
                        i, scale
                    )));
                }
            }
            ElementContent::Text { .. } => {}
        }
    }

    for (i, cue) in timeline.audio.iter().enumerate() {
        if cue.start.as_seconds() > total + 1e-9 {
            errors.push(MarenimaltError::TimelineValidation(format!(
                "audio cue {} ({}) starts after the timeline ends",
                i,
                cue.path.display()
            )));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
