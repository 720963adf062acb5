//! Channel stitching for mid-section measurements
//!
//! A mid-section measurement may be split into several channels separated by
//! islands. Each channel has exactly two edges. The outermost edges of the
//! whole section bound the final station sequence; every other edge is an
//! island boundary and becomes a synthetic interior panel.

use crate::domain::document::{Channel, Edge, OpenWater, Panel};
use crate::domain::errors::MappingError;
use crate::domain::result::MappingResult;
use std::borrow::Cow;

const BANK_EDGE_TYPE: &str = "Edge @ Bank";

/// An interior station, either a measured panel or a converted island edge
#[derive(Debug, Clone)]
pub struct InteriorPanel<'a> {
    pub panel: Cow<'a, Panel>,
    pub from_island_edge: bool,
}

/// Stations of a whole cross-section in start-to-end order
#[derive(Debug, Clone)]
pub struct StationSequence<'a> {
    pub start_edge: &'a Edge,
    pub panels: Vec<InteriorPanel<'a>>,
    pub end_edge: &'a Edge,
}

impl StationSequence<'_> {
    /// Number of verticals the sequence produces
    pub fn vertical_count(&self) -> usize {
        self.panels.len() + 2
    }
}

pub fn is_bank_edge(edge: &Edge) -> bool {
    edge.edge_type
        .as_deref()
        .is_some_and(|t| t.trim().eq_ignore_ascii_case(BANK_EDGE_TYPE))
}

/// Merges channels into one ordered station sequence
///
/// The first channel's bank edge (or its first edge when it has none) starts
/// the section; the last channel's remaining edge ends it. Panels keep their
/// original relative order. Two island edges that meet at the same tagmark
/// describe one shared boundary and produce a single synthetic panel.
///
/// Returns `None` when there are no channels.
///
/// # Errors
///
/// Returns [`MappingError::EdgeCount`] for any channel without exactly two edges.
pub fn assemble_stations(channels: &[Channel]) -> MappingResult<Option<StationSequence<'_>>> {
    let last_index = match channels.len() {
        0 => return Ok(None),
        n => n - 1,
    };

    let mut start_edge = None;
    let mut end_edge = None;
    let mut panels: Vec<InteriorPanel<'_>> = Vec::new();

    for (index, channel) in channels.iter().enumerate() {
        let [first, second] = channel.edges.as_slice() else {
            return Err(MappingError::EdgeCount {
                channel: index + 1,
                found: channel.edges.len(),
            });
        };

        // The first channel leads with its bank edge, later ones with an island edge
        let leads_with_first = if index == 0 {
            is_bank_edge(first) || !is_bank_edge(second)
        } else {
            !is_bank_edge(first) || is_bank_edge(second)
        };
        let (leading, trailing) = if leads_with_first {
            (first, second)
        } else {
            (second, first)
        };

        if index == 0 {
            start_edge = Some(leading);
        } else {
            push_island_panel(&mut panels, leading);
        }

        panels.extend(channel.panels.iter().map(|panel| InteriorPanel {
            panel: Cow::Borrowed(panel),
            from_island_edge: false,
        }));

        if index == last_index {
            end_edge = Some(trailing);
        } else {
            push_island_panel(&mut panels, trailing);
        }
    }

    match (start_edge, end_edge) {
        (Some(start_edge), Some(end_edge)) => Ok(Some(StationSequence {
            start_edge,
            panels,
            end_edge,
        })),
        _ => Ok(None),
    }
}

fn push_island_panel<'a>(panels: &mut Vec<InteriorPanel<'a>>, edge: &'a Edge) {
    let shared_boundary = panels.last().is_some_and(|last| {
        last.from_island_edge
            && same_tagmark(last.panel.tagmark.as_deref(), edge.tagmark.as_deref())
    });

    if shared_boundary {
        return;
    }

    panels.push(InteriorPanel {
        panel: Cow::Owned(island_panel(edge)),
        from_island_edge: true,
    });
}

fn same_tagmark(a: Option<&str>, b: Option<&str>) -> bool {
    let (Some(a), Some(b)) = (
        a.map(str::trim).filter(|t| !t.is_empty()),
        b.map(str::trim).filter(|t| !t.is_empty()),
    ) else {
        return false;
    };

    match (a.parse::<f64>(), b.parse::<f64>()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

/// Converts an island edge into an interior panel with no point observations
fn island_panel(edge: &Edge) -> Panel {
    Panel {
        panel_id: edge.panel_id,
        date: edge.date.clone(),
        tagmark: edge.tagmark.clone(),
        depth_reading: edge.depth.clone(),
        depth_with_offset: edge.depth.clone(),
        average_velocity: edge.velocity.clone(),
        discharge: edge.discharge.clone(),
        width: edge.width.clone(),
        flow: edge.flow.clone(),
        reverse_flow: Some("False".to_string()),
        open_water: Some(OpenWater {
            total_depth: edge.depth.clone(),
            ..Default::default()
        }),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(edge_type: &str, tagmark: &str) -> Edge {
        Edge {
            edge_type: Some(edge_type.to_string()),
            tagmark: Some(tagmark.to_string()),
            depth: Some("0.4".to_string()),
            ..Default::default()
        }
    }

    fn panel(tagmark: &str) -> Panel {
        Panel {
            tagmark: Some(tagmark.to_string()),
            ..Default::default()
        }
    }

    fn tagmarks(sequence: &StationSequence<'_>) -> Vec<String> {
        sequence
            .panels
            .iter()
            .map(|p| p.panel.tagmark.clone().unwrap_or_default())
            .collect()
    }

    #[test]
    fn test_single_channel_with_bank_edges() {
        let channels = vec![Channel {
            edges: vec![edge("Edge @ Bank", "0"), edge("Edge @ Bank", "10")],
            panels: vec![panel("2"), panel("5"), panel("8")],
        }];

        let sequence = assemble_stations(&channels).unwrap().unwrap();
        assert_eq!(sequence.vertical_count(), 5);
        assert_eq!(sequence.start_edge.tagmark.as_deref(), Some("0"));
        assert_eq!(sequence.end_edge.tagmark.as_deref(), Some("10"));
        assert_eq!(tagmarks(&sequence), ["2", "5", "8"]);
        assert!(sequence.panels.iter().all(|p| !p.from_island_edge));
    }

    #[test]
    fn test_first_channel_promotes_bank_edge_to_start() {
        let channels = vec![Channel {
            edges: vec![edge("Edge @ Island", "10"), edge("edge @ bank", "0")],
            panels: vec![panel("5")],
        }];

        let sequence = assemble_stations(&channels).unwrap().unwrap();
        assert_eq!(sequence.start_edge.tagmark.as_deref(), Some("0"));
        assert_eq!(sequence.end_edge.tagmark.as_deref(), Some("10"));
    }

    #[test]
    fn test_channel_without_bank_edges_uses_first_edge() {
        let channels = vec![Channel {
            edges: vec![edge("Edge @ Island", "1"), edge("Edge @ Island", "9")],
            panels: vec![],
        }];

        let sequence = assemble_stations(&channels).unwrap().unwrap();
        assert_eq!(sequence.start_edge.tagmark.as_deref(), Some("1"));
        assert_eq!(sequence.end_edge.tagmark.as_deref(), Some("9"));
        assert_eq!(sequence.vertical_count(), 2);
    }

    #[test]
    fn test_shared_island_boundary_becomes_one_panel() {
        let channels = vec![
            Channel {
                edges: vec![edge("Edge @ Bank", "0"), edge("Edge @ Island", "10")],
                panels: vec![panel("5")],
            },
            Channel {
                edges: vec![edge("Edge @ Island", "10.0"), edge("Edge @ Bank", "20")],
                panels: vec![panel("15")],
            },
        ];

        let sequence = assemble_stations(&channels).unwrap().unwrap();
        assert_eq!(tagmarks(&sequence), ["5", "10", "15"]);
        assert_eq!(sequence.vertical_count(), 5);
        assert!(sequence.panels[1].from_island_edge);
        assert_eq!(sequence.end_edge.tagmark.as_deref(), Some("20"));
    }

    #[test]
    fn test_island_with_width_keeps_both_edges() {
        let channels = vec![
            Channel {
                edges: vec![edge("Edge @ Bank", "0"), edge("Edge @ Island", "10")],
                panels: vec![panel("5")],
            },
            Channel {
                edges: vec![edge("Edge @ Island", "14"), edge("Edge @ Bank", "20")],
                panels: vec![panel("17")],
            },
        ];

        let sequence = assemble_stations(&channels).unwrap().unwrap();
        assert_eq!(tagmarks(&sequence), ["5", "10", "14", "17"]);
        assert_eq!(sequence.vertical_count(), 6);
    }

    #[test]
    fn test_middle_channel_contributes_both_island_edges() {
        let channels = vec![
            Channel {
                edges: vec![edge("Edge @ Bank", "0"), edge("Edge @ Island", "4")],
                panels: vec![],
            },
            Channel {
                edges: vec![edge("Edge @ Island", "6"), edge("Edge @ Island", "9")],
                panels: vec![panel("7")],
            },
            Channel {
                edges: vec![edge("Edge @ Bank", "20"), edge("Edge @ Island", "12")],
                panels: vec![panel("16")],
            },
        ];

        let sequence = assemble_stations(&channels).unwrap().unwrap();
        assert_eq!(tagmarks(&sequence), ["4", "6", "7", "9", "12", "16"]);
        assert_eq!(sequence.end_edge.tagmark.as_deref(), Some("20"));
    }

    #[test]
    fn test_island_panel_copies_edge_observations() {
        let channels = vec![
            Channel {
                edges: vec![edge("Edge @ Bank", "0"), edge("Edge @ Island", "4")],
                panels: vec![],
            },
            Channel {
                edges: vec![edge("Edge @ Island", "6"), edge("Edge @ Bank", "9")],
                panels: vec![],
            },
        ];

        let sequence = assemble_stations(&channels).unwrap().unwrap();
        let island = &sequence.panels[0].panel;
        assert_eq!(island.depth_reading.as_deref(), Some("0.4"));
        assert_eq!(island.reverse_flow.as_deref(), Some("False"));
        assert!(island.point_measurements.is_empty());
    }

    #[test]
    fn test_edge_count_violation() {
        let channels = vec![
            Channel {
                edges: vec![edge("Edge @ Bank", "0"), edge("Edge @ Bank", "10")],
                panels: vec![],
            },
            Channel {
                edges: vec![edge("Edge @ Bank", "20")],
                panels: vec![],
            },
        ];

        assert_eq!(
            assemble_stations(&channels).unwrap_err(),
            MappingError::EdgeCount {
                channel: 2,
                found: 1
            }
        );
    }

    #[test]
    fn test_no_channels() {
        assert!(assemble_stations(&[]).unwrap().is_none());
    }
}
