use std::io::Write;

use super::desk::RentLine;

/// Writes a rent roll as CSV with a header row: residence_id, name, kind, occupied, rent.
pub fn write_rent_roll<W: Write>(writer: W, lines: &[RentLine]) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for line in lines {
        csv_writer.serialize(line)?;
    }
    csv_writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::housing::domain::ResidenceId;

    #[test]
    fn rent_roll_has_header_and_one_row_per_residence() {
        let lines = vec![
            RentLine {
                residence_id: ResidenceId(0),
                name: "North Hall 101".to_string(),
                kind: "dorm",
                occupied: true,
                rent: 212.5,
            },
            RentLine {
                residence_id: ResidenceId(1),
                name: "Maple Court 3B".to_string(),
                kind: "apartment",
                occupied: false,
                rent: 1100.0,
            },
        ];

        let mut buffer = Vec::new();
        write_rent_roll(&mut buffer, &lines).expect("csv writes");
        let text = String::from_utf8(buffer).expect("utf8 output");
        let rows: Vec<&str> = text.lines().collect();

        assert_eq!(rows[0], "residence_id,name,kind,occupied,rent");
        assert_eq!(rows[1], "0,North Hall 101,dorm,true,212.5");
        assert!(rows[2].starts_with("1,Maple Court 3B,apartment,false,1100"));
        assert_eq!(rows.len(), 3);
    }

    #[test]
    fn empty_rent_roll_writes_nothing() {
        let mut buffer = Vec::new();
        write_rent_roll(&mut buffer, &[]).expect("csv writes");
        assert!(buffer.is_empty());
    }
}
