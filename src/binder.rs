//! Wires toggle controls to playable elements and mirrors playback state onto
//! the controls' playing class.

use crate::config::PlayerConfig;
use crate::error::{BindError, HostError};
use crate::host::{MediaEvent, Page, PlayableElement, ToggleControl};

/// Command issued by a toggle activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Play,
    Pause,
}

/// Control/element pairs resolved once at initialization.
#[derive(Debug, Clone)]
pub struct BindingTable<C, M> {
    pairs: Vec<(C, M)>,
    unpaired: Vec<usize>,
}

impl<C: ToggleControl, M: PlayableElement> BindingTable<C, M> {
    /// Pair every element matching the selector with the control that sits
    /// `offset` sibling nodes before it.
    pub fn build<P>(page: &P, selector: &str, offset: usize) -> Result<Self, HostError>
    where
        P: Page<Control = C, Media = M>,
    {
        let mut pairs = Vec::new();
        let mut unpaired = Vec::new();
        for (index, media) in page.playable_elements(selector)?.into_iter().enumerate() {
            match page.preceding_control(&media, offset) {
                Some(control) => pairs.push((control, media)),
                None => unpaired.push(index),
            }
        }
        Ok(Self { pairs, unpaired })
    }

    pub fn media_for(&self, control: &C) -> Option<&M> {
        self.pairs
            .iter()
            .find(|(c, _)| c == control)
            .map(|(_, m)| m)
    }

    pub fn control_for(&self, media: &M) -> Option<&C> {
        self.pairs
            .iter()
            .find(|(_, m)| m == media)
            .map(|(c, _)| c)
    }

    pub fn pairs(&self) -> &[(C, M)] {
        &self.pairs
    }

    /// Document-order indices of elements with no control at the offset.
    pub fn unpaired(&self) -> &[usize] {
        &self.unpaired
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Outcome of every binding step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindReport {
    pub primary: Result<(), BindError>,
    pub bound_pairs: usize,
    pub extra_toggles: usize,
    /// Controls and elements skipped because an earlier bind wired them.
    pub already_bound: usize,
    pub unpaired: Vec<usize>,
    pub failures: Vec<BindError>,
}

impl BindReport {
    pub fn is_clean(&self) -> bool {
        self.primary.is_ok() && self.unpaired.is_empty() && self.failures.is_empty()
    }
}

/// Whether a bind step attached listeners or found them already in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Wired {
    Attached,
    Skipped,
}

/// Flip playback on `media`. Issues exactly one command.
pub fn toggle<M: PlayableElement>(media: &M) -> Command {
    if media.is_paused() || media.is_ended() {
        media.play();
        Command::Play
    } else {
        media.pause();
        Command::Pause
    }
}

/// Attach all playback listeners for the page.
///
/// A failing step is recorded and the remaining steps still run. Calling it
/// again only wires controls and elements added since the last call.
pub fn bind_page<P: Page>(page: &P, config: &PlayerConfig) -> BindReport {
    let mut report = BindReport {
        primary: Ok(()),
        bound_pairs: 0,
        extra_toggles: 0,
        already_bound: 0,
        unpaired: Vec::new(),
        failures: Vec::new(),
    };

    let table = match BindingTable::build(page, &config.media_selector, config.control_offset) {
        Ok(table) => table,
        Err(err) => {
            log::warn!("could not collect playable elements: {err}");
            report.failures.push(err.into());
            BindingTable {
                pairs: Vec::new(),
                unpaired: Vec::new(),
            }
        }
    };
    report.unpaired = table.unpaired().to_vec();
    for index in &report.unpaired {
        log::warn!(
            "playable element #{index} has no control {} siblings back",
            config.control_offset
        );
    }

    let primary = bind_primary(page, &table, config);
    let primary_control = match primary {
        Ok((control, wired)) => {
            if wired == Wired::Skipped {
                report.already_bound += 1;
            }
            Some(control)
        }
        Err(err) => {
            log::warn!("primary toggle not wired: {err}");
            report.primary = Err(err);
            None
        }
    };

    for (control, media) in table.pairs() {
        match bind_reflection(control, media, config) {
            Ok(Wired::Attached) => report.bound_pairs += 1,
            Ok(Wired::Skipped) => report.already_bound += 1,
            Err(err) => {
                log::warn!("state listeners for {} failed: {err}", control.describe());
                report.failures.push(err.into());
            }
        }

        if config.toggle_every_pair && primary_control.as_ref() != Some(control) {
            match bind_toggle(control, media) {
                Ok(Wired::Attached) => report.extra_toggles += 1,
                Ok(Wired::Skipped) => report.already_bound += 1,
                Err(err) => {
                    log::warn!("toggle for {} failed: {err}", control.describe());
                    report.failures.push(err.into());
                }
            }
        }
    }

    log::info!(
        "bound {} player(s), {} extra toggle(s), {} already bound, primary {}",
        report.bound_pairs,
        report.extra_toggles,
        report.already_bound,
        if report.primary.is_ok() { "ok" } else { "missing" }
    );
    report
}

/// The primary control drives its next element sibling. The binding table
/// covers layouts with a wrapper between the two.
fn bind_primary<P: Page>(
    page: &P,
    table: &BindingTable<P::Control, P::Media>,
    config: &PlayerConfig,
) -> Result<(P::Control, Wired), BindError> {
    let control = page
        .control_by_id(&config.control_id)
        .ok_or_else(|| BindError::MissingControl(config.control_id.clone()))?;
    let media = page
        .following_media(&control)
        .or_else(|| table.media_for(&control).cloned())
        .ok_or_else(|| BindError::NoPlayableElement(config.control_id.clone()))?;
    let wired = bind_toggle(&control, &media)?;
    Ok((control, wired))
}

fn bind_toggle<C: ToggleControl, M: PlayableElement>(
    control: &C,
    media: &M,
) -> Result<Wired, HostError> {
    if control.is_bound() {
        return Ok(Wired::Skipped);
    }
    let media = media.clone();
    let label = control.describe();
    control.on_activate(Box::new(move || {
        let command = toggle(&media);
        log::debug!("{label}: {command:?}");
    }))?;
    control.mark_bound();
    Ok(Wired::Attached)
}

fn bind_reflection<C: ToggleControl, M: PlayableElement>(
    control: &C,
    media: &M,
    config: &PlayerConfig,
) -> Result<Wired, HostError> {
    if media.is_bound() {
        return Ok(Wired::Skipped);
    }
    let mut wiring = vec![
        (MediaEvent::Play, true),
        (MediaEvent::Playing, true),
        (MediaEvent::Ended, false),
    ];
    if config.clear_on_pause {
        wiring.push((MediaEvent::Pause, false));
    }

    for (event, playing) in wiring {
        let control = control.clone();
        let class = config.playing_class.clone();
        media.on_event(
            event,
            Box::new(move || {
                control.set_class(&class, playing);
            }),
        )?;
    }
    media.mark_bound();
    Ok(Wired::Attached)
}
