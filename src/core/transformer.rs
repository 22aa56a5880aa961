//! Field rules that remap a vendor catalog row onto the destination schema.
//!
//! A row is first lifted into a typed [`CatalogItem`], which fails with
//! [`TransformError::MissingField`] as soon as one of the
//! [`REQUIRED_SOURCE_FIELDS`] is absent. Every destination value is then
//! derived from the item, and finally laid out in the order of the
//! [`DestinationSchema`] read from the template file.

use crate::domain::model::{DestinationRecord, DestinationSchema, DestinationValue, SourceRecord};
use crate::utils::error::TransformError;
use std::collections::HashMap;

/// Every destination field the rules produce, in the destination vendor's column order.
pub const DESTINATION_FIELDS: [&str; 75] = [
    "ean13",
    "weight",
    "length",
    "width",
    "height",
    "prop_65",
    "cost_price",
    "min_price",
    "made_to_order",
    "product__product_class__name",
    "product__brand__name",
    "product__title",
    "product__description",
    "product__bullets__0",
    "product__bullets__1",
    "product__bullets__2",
    "product__bullets__3",
    "product__bullets__4",
    "product__bullets__5",
    "product__bullets__6",
    "product__configuration__codes",
    "product__multipack_quantity",
    "product__country_of_origin__alpha_3",
    "product__parent_sku",
    "attrib__arm_height",
    "attrib__assembly_required",
    "attrib__back_material",
    "attrib__blade_finish",
    "attrib__bulb_included",
    "attrib__bulb_type",
    "attrib__color",
    "attrib__cord_length",
    "attrib__design_id",
    "attrib__designer",
    "attrib__distressed_finish",
    "attrib__fill",
    "attrib__finish",
    "attrib__frame_color",
    "attrib__hardwire",
    "attrib__kit",
    "attrib__leg_color",
    "attrib__leg_finish",
    "attrib__material",
    "attrib__number_bulbs",
    "attrib__orientation",
    "attrib__outdoor_safe",
    "attrib__pile_height",
    "attrib__seat_depth",
    "attrib__seat_height",
    "attrib__seat_width",
    "attrib__shade",
    "attrib__size",
    "attrib__switch_type",
    "attrib__ul_certified",
    "attrib__warranty_years",
    "attrib__wattage",
    "attrib__weave",
    "attrib__weight_capacity",
    "boxes__0__weight",
    "boxes__0__length",
    "boxes__0__height",
    "boxes__0__width",
    "boxes__1__weight",
    "boxes__1__length",
    "boxes__1__height",
    "boxes__1__width",
    "boxes__2__weight",
    "boxes__2__length",
    "boxes__2__height",
    "boxes__2__width",
    "boxes__3__weight",
    "boxes__3__length",
    "boxes__3__height",
    "boxes__3__width",
    "product__styles",
];

/// Source columns a row must carry to be transformed.
pub const REQUIRED_SOURCE_FIELDS: [&str; 53] = [
    "upc",
    "item weight (pounds)",
    "item depth (inches)",
    "item width (inches)",
    "item height (inches)",
    "url california label (jpg)",
    "url california label (pdf)",
    "wholesale ($)",
    "map ($)",
    "item category",
    "brand",
    "item type",
    "description",
    "selling point 1",
    "selling point 2",
    "selling point 3",
    "selling point 4",
    "selling point 5",
    "selling point 6",
    "selling point 7",
    "country of origin",
    "furniture arm height (inches)",
    "bulb 1 included",
    "bulb 1 type",
    "primary color family",
    "cord length (inches)",
    "item finish",
    "conversion kit option",
    "item materials",
    "bulb 1 count",
    "bulb 2 count",
    "outdoor",
    "furniture seat height (inches)",
    "furniture seat dimensions (inches)",
    "shade/glass description",
    "switch type",
    "bulb 1 wattage",
    "furniture weight capacity (pounds)",
    "carton 1 weight (pounds)",
    "carton 1 length (inches)",
    "carton 1 height (inches)",
    "carton 1 width (inches)",
    "carton 2 weight (pounds)",
    "carton 2 length (inches)",
    "carton 2 height (inches)",
    "carton 2 width (inches)",
    "carton 3 weight (pounds)",
    "carton 3 length (inches)",
    "carton 3 height (inches)",
    "carton 3 width (inches)",
    "item style",
    "item substyle",
    "item substyle 2",
];

const SELLING_POINT_FIELDS: [&str; 7] = [
    "selling point 1",
    "selling point 2",
    "selling point 3",
    "selling point 4",
    "selling point 5",
    "selling point 6",
    "selling point 7",
];

const BULLET_FIELDS: [&str; 7] = [
    "product__bullets__0",
    "product__bullets__1",
    "product__bullets__2",
    "product__bullets__3",
    "product__bullets__4",
    "product__bullets__5",
    "product__bullets__6",
];

// weight, length, height, width
const CARTON_FIELDS: [[&str; 4]; 3] = [
    [
        "carton 1 weight (pounds)",
        "carton 1 length (inches)",
        "carton 1 height (inches)",
        "carton 1 width (inches)",
    ],
    [
        "carton 2 weight (pounds)",
        "carton 2 length (inches)",
        "carton 2 height (inches)",
        "carton 2 width (inches)",
    ],
    [
        "carton 3 weight (pounds)",
        "carton 3 length (inches)",
        "carton 3 height (inches)",
        "carton 3 width (inches)",
    ],
];

const BOX_FIELDS: [[&str; 4]; 4] = [
    ["boxes__0__weight", "boxes__0__length", "boxes__0__height", "boxes__0__width"],
    ["boxes__1__weight", "boxes__1__length", "boxes__1__height", "boxes__1__width"],
    ["boxes__2__weight", "boxes__2__length", "boxes__2__height", "boxes__2__width"],
    ["boxes__3__weight", "boxes__3__length", "boxes__3__height", "boxes__3__width"],
];

/// Destination fields the source catalog has no equivalent for.
const UNSOURCED_FIELDS: [&str; 22] = [
    "made_to_order",
    "product__configuration__codes",
    "product__multipack_quantity",
    "product__parent_sku",
    "attrib__assembly_required",
    "attrib__back_material",
    "attrib__blade_finish",
    "attrib__design_id",
    "attrib__designer",
    "attrib__distressed_finish",
    "attrib__fill",
    "attrib__frame_color",
    "attrib__hardwire",
    "attrib__leg_color",
    "attrib__leg_finish",
    "attrib__orientation",
    "attrib__pile_height",
    "attrib__seat_depth",
    "attrib__size",
    "attrib__ul_certified",
    "attrib__warranty_years",
    "attrib__weave",
];

const PROP_65_MARKER: &str = "P65";
const STYLE_SEPARATOR: &str = ", ";
const UPC_MIN_LEN: usize = 12;

/// One shipping carton of a catalog item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Carton<'a> {
    pub weight: &'a str,
    pub length: &'a str,
    pub height: &'a str,
    pub width: &'a str,
}

impl<'a> Carton<'a> {
    fn from_source(record: &'a SourceRecord, names: &[&str; 4]) -> Result<Self, TransformError> {
        Ok(Self {
            weight: required(record, names[0])?,
            length: required(record, names[1])?,
            height: required(record, names[2])?,
            width: required(record, names[3])?,
        })
    }
}

/// A source row with every column the rules read, borrowed from the record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogItem<'a> {
    pub upc: &'a str,
    pub weight: &'a str,
    pub depth: &'a str,
    pub width: &'a str,
    pub height: &'a str,
    pub california_label_jpg: &'a str,
    pub california_label_pdf: &'a str,
    pub wholesale_price: &'a str,
    pub map_price: &'a str,
    pub category: &'a str,
    pub brand: &'a str,
    pub item_type: &'a str,
    pub description: &'a str,
    pub selling_points: [&'a str; 7],
    pub country_of_origin: &'a str,
    pub arm_height: &'a str,
    pub bulb_included: &'a str,
    pub bulb_type: &'a str,
    pub color_family: &'a str,
    pub cord_length: &'a str,
    pub finish: &'a str,
    pub conversion_kit: &'a str,
    pub materials: &'a str,
    pub bulb_1_count: &'a str,
    pub bulb_2_count: &'a str,
    pub outdoor: &'a str,
    pub seat_height: &'a str,
    pub seat_dimensions: &'a str,
    pub shade_description: &'a str,
    pub switch_type: &'a str,
    pub wattage: &'a str,
    pub weight_capacity: &'a str,
    pub cartons: [Carton<'a>; 3],
    pub style: &'a str,
    pub substyle: &'a str,
    pub substyle_2: &'a str,
}

fn required<'a>(record: &'a SourceRecord, name: &str) -> Result<&'a str, TransformError> {
    record.get(name).ok_or_else(|| TransformError::missing(name))
}

impl<'a> CatalogItem<'a> {
    pub fn from_source(record: &'a SourceRecord) -> Result<Self, TransformError> {
        let mut selling_points = [""; 7];
        for (point, name) in selling_points.iter_mut().zip(SELLING_POINT_FIELDS) {
            *point = required(record, name)?;
        }

        let mut cartons = [Carton::default(); 3];
        for (carton, names) in cartons.iter_mut().zip(CARTON_FIELDS.iter()) {
            *carton = Carton::from_source(record, names)?;
        }

        Ok(Self {
            upc: required(record, "upc")?,
            weight: required(record, "item weight (pounds)")?,
            depth: required(record, "item depth (inches)")?,
            width: required(record, "item width (inches)")?,
            height: required(record, "item height (inches)")?,
            california_label_jpg: required(record, "url california label (jpg)")?,
            california_label_pdf: required(record, "url california label (pdf)")?,
            wholesale_price: required(record, "wholesale ($)")?,
            map_price: required(record, "map ($)")?,
            category: required(record, "item category")?,
            brand: required(record, "brand")?,
            item_type: required(record, "item type")?,
            description: required(record, "description")?,
            selling_points,
            country_of_origin: required(record, "country of origin")?,
            arm_height: required(record, "furniture arm height (inches)")?,
            bulb_included: required(record, "bulb 1 included")?,
            bulb_type: required(record, "bulb 1 type")?,
            color_family: required(record, "primary color family")?,
            cord_length: required(record, "cord length (inches)")?,
            finish: required(record, "item finish")?,
            conversion_kit: required(record, "conversion kit option")?,
            materials: required(record, "item materials")?,
            bulb_1_count: required(record, "bulb 1 count")?,
            bulb_2_count: required(record, "bulb 2 count")?,
            outdoor: required(record, "outdoor")?,
            seat_height: required(record, "furniture seat height (inches)")?,
            seat_dimensions: required(record, "furniture seat dimensions (inches)")?,
            shade_description: required(record, "shade/glass description")?,
            switch_type: required(record, "switch type")?,
            wattage: required(record, "bulb 1 wattage")?,
            weight_capacity: required(record, "furniture weight capacity (pounds)")?,
            cartons,
            style: required(record, "item style")?,
            substyle: required(record, "item substyle")?,
            substyle_2: required(record, "item substyle 2")?,
        })
    }
}

/// Rewrites a UPC as a zero-prefixed, hyphen-grouped EAN13 code: `0` + the first
/// two characters, `-`, the next nine, `-`, the last character.
///
/// Pure slicing: short or non-numeric input yields a shortened code, not an error.
/// Empty or absent input yields an empty string.
pub fn convert_upc(upc: Option<&str>) -> String {
    let upc = match upc {
        Some(upc) if !upc.is_empty() => upc,
        _ => return String::new(),
    };

    let chars: Vec<char> = upc.chars().collect();
    let head: String = chars.iter().take(2).collect();
    let body: String = chars.iter().skip(2).take(9).collect();
    let last = chars.last().map(char::to_string).unwrap_or_default();

    format!("0{}-{}-{}", head, body, last)
}

/// [`convert_upc`] that rejects anything but an empty value or at least twelve digits.
pub fn convert_upc_strict(upc: Option<&str>) -> Result<String, TransformError> {
    if let Some(value) = upc.filter(|value| !value.is_empty()) {
        let malformed = |reason: &str| TransformError::MalformedValue {
            field: "upc".to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        };

        if !value.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed("UPC must contain only digits"));
        }
        if value.len() < UPC_MIN_LEN {
            return Err(malformed("UPC must be at least 12 digits long"));
        }
    }

    Ok(convert_upc(upc))
}

fn is_digits(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}

/// Total bulb count when both counts are plain digit strings, otherwise the
/// first non-empty count as given.
pub fn number_of_bulbs(first: &str, second: &str) -> DestinationValue {
    if is_digits(first) && is_digits(second) {
        let sum = first
            .parse::<u64>()
            .ok()
            .zip(second.parse::<u64>().ok())
            .and_then(|(a, b)| a.checked_add(b));
        if let Some(sum) = sum {
            return DestinationValue::Integer(sum);
        }
    }

    if !first.is_empty() {
        DestinationValue::text(first)
    } else {
        DestinationValue::text(second)
    }
}

/// Joins the non-empty style parts with `", "`.
pub fn join_styles(parts: &[&str]) -> String {
    parts
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(STYLE_SEPARATOR)
        .trim_matches(|c: char| c == ',' || c == ' ')
        .to_string()
}

pub fn has_prop_65_label(jpg_url: &str, pdf_url: &str) -> bool {
    jpg_url.contains(PROP_65_MARKER) || pdf_url.contains(PROP_65_MARKER)
}

fn country_code(country: &str) -> String {
    country.chars().take(3).collect()
}

fn non_empty(value: &str) -> Option<&str> {
    (!value.is_empty()).then_some(value)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransformOptions {
    /// Fail rows whose UPC is not a plausible code instead of slicing it anyway.
    pub strict_upc: bool,
}

/// Turns one [`SourceRecord`] into one [`DestinationRecord`]. Holds no state between rows.
#[derive(Debug, Clone, Default)]
pub struct RowTransformer {
    options: TransformOptions,
}

impl RowTransformer {
    pub fn new(options: TransformOptions) -> Self {
        Self { options }
    }

    pub fn transform(
        &self,
        record: &SourceRecord,
        schema: &DestinationSchema,
    ) -> Result<DestinationRecord, TransformError> {
        let item = CatalogItem::from_source(record)?;
        let derived: HashMap<&'static str, DestinationValue> =
            self.derive(&item)?.into_iter().collect();

        let fields = schema
            .fields()
            .iter()
            .map(|name| {
                let value = derived
                    .get(name.as_str())
                    .cloned()
                    .unwrap_or(DestinationValue::Null);
                (name.clone(), value)
            })
            .collect();

        Ok(DestinationRecord::new(fields))
    }

    /// Every derived field in [`DESTINATION_FIELDS`] order.
    pub fn derive(
        &self,
        item: &CatalogItem<'_>,
    ) -> Result<Vec<(&'static str, DestinationValue)>, TransformError> {
        let ean13 = if self.options.strict_upc {
            convert_upc_strict(Some(item.upc))?
        } else {
            convert_upc(Some(item.upc))
        };

        let mut fields: Vec<(&'static str, DestinationValue)> = Vec::with_capacity(DESTINATION_FIELDS.len());
        fields.push(("ean13", ean13.into()));
        fields.push(("weight", item.weight.into()));
        fields.push(("length", item.depth.into()));
        fields.push(("width", item.width.into()));
        fields.push(("height", item.height.into()));
        fields.push((
            "prop_65",
            has_prop_65_label(item.california_label_jpg, item.california_label_pdf).into(),
        ));
        fields.push(("cost_price", item.wholesale_price.into()));
        fields.push(("min_price", item.map_price.into()));
        fields.push(("product__product_class__name", item.category.into()));
        fields.push(("product__brand__name", item.brand.into()));
        fields.push(("product__title", item.item_type.into()));
        fields.push(("product__description", item.description.into()));
        for (name, point) in BULLET_FIELDS.into_iter().zip(item.selling_points) {
            fields.push((name, point.into()));
        }
        fields.push((
            "product__country_of_origin__alpha_3",
            country_code(item.country_of_origin).into(),
        ));
        fields.push(("attrib__arm_height", item.arm_height.into()));
        fields.push(("attrib__bulb_included", (!item.bulb_included.is_empty()).into()));
        fields.push(("attrib__bulb_type", item.bulb_type.into()));
        fields.push(("attrib__color", item.color_family.into()));
        fields.push(("attrib__cord_length", item.cord_length.into()));
        fields.push(("attrib__finish", item.finish.into()));
        fields.push(("attrib__kit", non_empty(item.conversion_kit).into()));
        fields.push(("attrib__material", item.materials.into()));
        fields.push((
            "attrib__number_bulbs",
            number_of_bulbs(item.bulb_1_count, item.bulb_2_count),
        ));
        fields.push(("attrib__outdoor_safe", item.outdoor.into()));
        fields.push(("attrib__seat_height", item.seat_height.into()));
        fields.push(("attrib__seat_width", item.seat_dimensions.into()));
        fields.push(("attrib__shade", (!item.shade_description.is_empty()).into()));
        fields.push(("attrib__switch_type", item.switch_type.into()));
        fields.push(("attrib__wattage", item.wattage.into()));
        fields.push(("attrib__weight_capacity", item.weight_capacity.into()));
        for (names, carton) in BOX_FIELDS.iter().zip(item.cartons) {
            fields.push((names[0], carton.weight.into()));
            fields.push((names[1], carton.length.into()));
            fields.push((names[2], carton.height.into()));
            fields.push((names[3], carton.width.into()));
        }
        // the destination has room for a fourth box the source never fills
        for name in BOX_FIELDS[3] {
            fields.push((name, DestinationValue::Null));
        }
        fields.push((
            "product__styles",
            join_styles(&[item.style, item.substyle, item.substyle_2]).into(),
        ));
        for name in UNSOURCED_FIELDS {
            fields.push((name, DestinationValue::Null));
        }

        let order: HashMap<&str, usize> = DESTINATION_FIELDS
            .iter()
            .enumerate()
            .map(|(index, name)| (*name, index))
            .collect();
        fields.sort_by_key(|(name, _)| order.get(name).copied().unwrap_or(usize::MAX));

        Ok(fields)
    }
}
