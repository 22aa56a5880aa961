#![allow(dead_code)]

use catalog_etl::core::transformer::{DESTINATION_FIELDS, REQUIRED_SOURCE_FIELDS};
use catalog_etl::ConverterConfig;
use std::collections::HashMap;
use std::path::Path;
use tempfile::TempDir;

pub type Row = HashMap<&'static str, String>;

/// A lamp row with every required column, most of them filled.
pub fn lamp_row(item_number: &str) -> Row {
    let mut row: Row = REQUIRED_SOURCE_FIELDS
        .iter()
        .map(|name| (*name, String::new()))
        .collect();
    row.insert("item number", item_number.to_string());

    let values = [
        ("upc", "842156301227"),
        ("item weight (pounds)", "9.8"),
        ("item depth (inches)", "11"),
        ("item width (inches)", "11"),
        ("item height (inches)", "27.5"),
        ("url california label (jpg)", "https://assets.example.com/prop65/P65_label.jpg"),
        ("url california label (pdf)", ""),
        ("wholesale ($)", "84.00"),
        ("map ($)", "168.00"),
        ("item category", "Table Lamps"),
        ("brand", "Harbor Light"),
        ("item type", "Table Lamp"),
        ("description", "Stoneware base, linen drum shade, 3-way switch."),
        ("selling point 1", "Reactive glaze finish"),
        ("selling point 2", "Linen drum shade"),
        ("country of origin", "CHN - China"),
        ("bulb 1 included", "No"),
        ("bulb 1 type", "A19"),
        ("primary color family", "Blue"),
        ("cord length (inches)", "96"),
        ("item finish", "Reactive Blue"),
        ("conversion kit option", ""),
        ("item materials", "Stoneware, Linen"),
        ("bulb 1 count", "1"),
        ("bulb 2 count", "2"),
        ("outdoor", "No"),
        ("shade/glass description", "Natural linen drum"),
        ("switch type", "3-Way Socket"),
        ("bulb 1 wattage", "150"),
        ("carton 1 weight (pounds)", "12.1"),
        ("carton 1 length (inches)", "18"),
        ("carton 1 height (inches)", "30"),
        ("carton 1 width (inches)", "18"),
        ("item style", "Coastal"),
        ("item substyle", ""),
        ("item substyle 2", "Transitional"),
    ];
    for (name, value) in values {
        row.insert(name, value.to_string());
    }
    row
}

pub fn input_header() -> Vec<&'static str> {
    let mut header = vec!["item number"];
    header.extend(REQUIRED_SOURCE_FIELDS);
    header
}

/// Writes rows under `header`; a row that lacks a header column is written short.
pub fn write_input(path: &Path, header: &[&str], rows: &[Row]) {
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_path(path)
        .unwrap();
    writer.write_record(header).unwrap();
    for row in rows {
        let cells: Vec<&str> = header
            .iter()
            .map_while(|name| row.get(name).map(String::as_str))
            .collect();
        writer.write_record(&cells).unwrap();
    }
    writer.flush().unwrap();
}

pub fn write_template(path: &Path, fields: &[&str]) {
    let mut writer = csv::Writer::from_path(path).unwrap();
    writer.write_record(fields).unwrap();
    writer.flush().unwrap();
}

pub fn full_template() -> Vec<&'static str> {
    DESTINATION_FIELDS.to_vec()
}

pub fn config_in(dir: &TempDir) -> ConverterConfig {
    let mut config = ConverterConfig::default();
    let path = |name: &str| dir.path().join(name).to_string_lossy().into_owned();
    config.files.input = path("homework.csv");
    config.files.output = path("formatted.csv");
    config.files.template = path("example.csv");
    config.logging.file = None;
    config
}

/// Output rows as header-keyed maps.
pub fn read_output(path: &Path) -> (Vec<String>, Vec<HashMap<String, String>>) {
    let mut reader = csv::Reader::from_path(path).unwrap();
    let header: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
    let rows = reader
        .records()
        .map(|record| {
            let record = record.unwrap();
            header
                .iter()
                .cloned()
                .zip(record.iter().map(String::from))
                .collect()
        })
        .collect();
    (header, rows)
}
