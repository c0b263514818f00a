//! Detail view data handed to the viewer when a thumbnail is selected

use super::catalog::Item;
use uuid::Uuid;

/// Number of focal planes imaged per specimen
pub const FOCAL_PLANE_COUNT: usize = 5;

/// Image pixels covered by one terminal column in the viewer
pub const PIXELS_PER_COLUMN: f64 = 8.0;

/// One titled block of metadata fields
#[derive(Debug, Clone, PartialEq)]
pub struct MetadataPanel {
    pub title: &'static str,
    pub fields: Vec<(&'static str, String)>,
}

/// Reference to one focal-plane image of the stack
#[derive(Debug, Clone, PartialEq)]
pub struct FocalPlane {
    /// 1-based focus depth index
    pub index: usize,
    /// `{itemId}_{index}`
    pub name: String,
    pub url: String,
}

/// Everything the viewer needs for one item
#[derive(Debug, Clone, PartialEq)]
pub struct DetailView {
    pub item_id: Uuid,
    pub comment: Option<String>,
    pub is_reference: bool,
    pub panels: Vec<MetadataPanel>,
    pub focal_planes: Vec<FocalPlane>,
    pub voxel_width: Option<f64>,
}

impl DetailView {
    pub fn from_item(item: &Item, image_base_url: &str) -> Self {
        let slide = item.slide.clone().unwrap_or_default();
        let sample = &slide.sample;
        let study = &sample.study;

        let text = |value: &Option<String>| value.clone().unwrap_or_default();

        let panels = vec![
            MetadataPanel {
                title: "Study",
                fields: vec![
                    ("Description", text(&study.description)),
                    ("Location", text(&study.location)),
                    ("Remarks", text(&study.remarks)),
                ],
            },
            MetadataPanel {
                title: "Sample",
                fields: vec![
                    ("Description", text(&sample.description)),
                    ("Location", text(&sample.location)),
                    ("Age", text(&sample.age)),
                    ("Remarks", text(&sample.remarks)),
                ],
            },
            MetadataPanel {
                title: "Slide",
                fields: vec![
                    ("Description", text(&slide.description)),
                    ("Remarks", text(&slide.remarks)),
                ],
            },
        ];

        Self {
            item_id: item.id,
            comment: item.comment.clone(),
            is_reference: item.is_reference(),
            panels,
            focal_planes: focal_planes(item.id, image_base_url),
            voxel_width: item.voxel_width,
        }
    }
}

/// Ordered focal-plane references `{itemId}_1` .. `{itemId}_5`
pub fn focal_planes(item_id: Uuid, image_base_url: &str) -> Vec<FocalPlane> {
    let base = image_base_url.trim_end_matches('/');
    (1..=FOCAL_PLANE_COUNT)
        .map(|index| {
            let name = format!("{}_{}", item_id, index);
            let url = format!("{}/{}.png", base, name);
            FocalPlane { index, name, url }
        })
        .collect()
}

/// A scale bar sized to fit the viewer width
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleBar {
    /// Physical length represented by the bar, in micrometres
    pub length_um: f64,
    /// Terminal columns the bar occupies
    pub columns: u16,
}

impl ScaleBar {
    /// Pick the largest 1/2/5 × 10^k length that fits in `max_columns`
    pub fn fit(voxel_width: f64, max_columns: u16) -> Option<Self> {
        if !(voxel_width.is_finite() && voxel_width > 0.0) || max_columns == 0 {
            return None;
        }
        let um_per_column = voxel_width * PIXELS_PER_COLUMN;
        let max_um = um_per_column * f64::from(max_columns);

        let magnitude = 10f64.powf(max_um.log10().floor());
        let length_um = [5.0, 2.0, 1.0]
            .iter()
            .map(|step| step * magnitude)
            .find(|len| *len <= max_um)?;

        let columns = (length_um / um_per_column).round().max(1.0) as u16;
        Some(Self {
            length_um,
            columns: columns.min(max_columns),
        })
    }

    pub fn label(&self) -> String {
        if self.length_um >= 1.0 {
            format!("{} µm", self.length_um)
        } else {
            format!("{} nm", (self.length_um * 1000.0).round())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::catalog::{Sample, Slide, Study};

    fn sample_item() -> Item {
        Item {
            id: Uuid::from_u128(0xabc),
            key_image: String::new(),
            family_id: None,
            genus_id: None,
            species_id: None,
            comment: Some("tricolporate".into()),
            slide: Some(Slide {
                description: Some("slide d".into()),
                remarks: Some("slide r".into()),
                sample: Sample {
                    description: Some("sample d".into()),
                    location: Some("sample l".into()),
                    age: Some("sample a".into()),
                    remarks: Some("sample r".into()),
                    study: Study {
                        description: Some("study d".into()),
                        location: Some("study l".into()),
                        remarks: Some("study r".into()),
                        is_reference: true,
                    },
                },
            }),
            voxel_width: Some(0.1),
        }
    }

    #[test]
    fn test_detail_view_has_all_metadata_fields() {
        let view = DetailView::from_item(&sample_item(), "http://img/");
        let values: Vec<&str> = view
            .panels
            .iter()
            .flat_map(|p| p.fields.iter().map(|(_, v)| v.as_str()))
            .collect();

        assert_eq!(
            values,
            vec![
                "study d", "study l", "study r", "sample d", "sample l", "sample a", "sample r",
                "slide d", "slide r"
            ]
        );
        assert!(view.is_reference);
        assert_eq!(view.voxel_width, Some(0.1));
    }

    #[test]
    fn test_focal_planes_named_by_item_id() {
        let id = Uuid::from_u128(0xabc);
        let planes = focal_planes(id, "http://img/");
        assert_eq!(planes.len(), FOCAL_PLANE_COUNT);
        for (i, plane) in planes.iter().enumerate() {
            assert_eq!(plane.index, i + 1);
            assert_eq!(plane.name, format!("{}_{}", id, i + 1));
            assert_eq!(plane.url, format!("http://img/{}_{}.png", id, i + 1));
        }
    }

    #[test]
    fn test_scale_bar_picks_nice_length() {
        // 0.1 µm/px * 8 px/col = 0.8 µm per column; 30 columns = 24 µm
        let bar = ScaleBar::fit(0.1, 30).unwrap();
        assert_eq!(bar.length_um, 20.0);
        assert_eq!(bar.columns, 25);
        assert_eq!(bar.label(), "20 µm");
    }

    #[test]
    fn test_scale_bar_rejects_bad_input() {
        assert!(ScaleBar::fit(0.0, 30).is_none());
        assert!(ScaleBar::fit(-1.0, 30).is_none());
        assert!(ScaleBar::fit(f64::NAN, 30).is_none());
        assert!(ScaleBar::fit(0.1, 0).is_none());
    }

    #[test]
    fn test_scale_bar_sub_micrometre() {
        // 0.001 µm/px * 8 = 0.008 µm per column; 10 columns = 0.08 µm -> 50 nm
        let bar = ScaleBar::fit(0.001, 10).unwrap();
        assert!((bar.length_um - 0.05).abs() < 1e-9);
        assert_eq!(bar.label(), "50 nm");
    }
}
