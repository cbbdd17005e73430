//! CSV export for batch geocoding.

use anyhow::Result;
use std::io::Write;

use crate::aggregate::batch::BatchTable;

/// Header row: `Address`, then `{Name}_Lat`, `{Name}_Lon` per provider
pub fn batch_headers(table: &BatchTable) -> Vec<String> {
    let mut headers = vec!["Address".to_string()];
    for provider in &table.providers {
        headers.push(format!("{}_Lat", provider.display_name()));
        headers.push(format!("{}_Lon", provider.display_name()));
    }
    headers
}

/// Write one CSV row per address; misses are empty cells
pub fn write_batch_csv<W: Write>(table: &BatchTable, writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(batch_headers(table))?;

    for row in &table.rows {
        let mut record = Vec::with_capacity(1 + row.points.len() * 2);
        record.push(row.address.clone());
        for point in &row.points {
            match point {
                Some(p) => {
                    record.push(p.lat.to_string());
                    record.push(p.lon.to_string());
                }
                None => {
                    record.push(String::new());
                    record.push(String::new());
                }
            }
        }
        csv_writer.write_record(&record)?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Batch CSV as a string (for HTTP responses)
pub fn batch_csv_string(table: &BatchTable) -> Result<String> {
    let mut buf = Vec::new();
    write_batch_csv(table, &mut buf)?;
    Ok(String::from_utf8(buf)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::batch::BatchRow;
    use crate::models::{GeoPoint, ProviderId};

    #[test]
    fn test_batch_csv() {
        let mut table = BatchTable::new(&[ProviderId::Nominatim, ProviderId::ArcGis]);
        table.rows.push(BatchRow {
            address: "201 W Capitol Ave, Jefferson City, MO".to_string(),
            points: vec![Some(GeoPoint::new(38.5793, -92.1728)), None],
        });
        table.rows.push(BatchRow {
            address: "Nowhere".to_string(),
            points: vec![None, None],
        });

        let csv = batch_csv_string(&table).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Address,Nominatim_Lat,Nominatim_Lon,ArcGIS_Lat,ArcGIS_Lon",
                "\"201 W Capitol Ave, Jefferson City, MO\",38.5793,-92.1728,,",
                "Nowhere,,,,",
            ]
        );
    }
}
