//! Reader for plain-text event dumps
//!
//! Each event is a block of whitespace-separated records:
//!
//! ```text
//! event
//! jet    <pt> <eta> <phi> <msoftdrop>
//! gen    <pdgId> <statusFlags> <eta> <phi> <mother>
//! pfcand <jetIdx> <candIdx> <pt>
//! end
//! ```
//!
//! A negative mother index means that the particle has no mother. Anything
//! following a `#` is a comment.

use crate::{event::Event, numeric::Float, Result};

use eyre::{bail, ensure, eyre, WrapErr};

use std::{fs, path::Path, str::FromStr};

/// Load all events from an event dump file
pub fn load_events(path: impl AsRef<Path>) -> Result<Vec<Event>> {
    let path = path.as_ref();
    let dump = fs::read_to_string(path)
        .wrap_err_with(|| format!("Failed to read events from {}", path.display()))?;
    parse_events(&dump).wrap_err_with(|| format!("Malformed event dump {}", path.display()))
}

/// Decode the events of an event dump
pub fn parse_events(dump: &str) -> Result<Vec<Event>> {
    let mut events = Vec::new();
    let mut current: Option<Event> = None;
    for (line_idx, line) in dump.lines().enumerate() {
        let line = line.split('#').next().unwrap_or_default();
        let mut fields = line.split_whitespace();
        let Some(record) = fields.next() else { continue };
        let fields = fields.collect::<Vec<_>>();
        let line_no = line_idx + 1;
        match (record, current.as_mut()) {
            ("event", None) => current = Some(Event::default()),
            ("event", Some(_)) => bail!("Line {}: event opened before the previous one ended", line_no),
            ("end", Some(_)) => events.extend(current.take()),
            (_, None) => bail!("Line {}: {} record outside of an event", line_no, record),
            (_, Some(event)) => parse_record(event, record, &fields)
                .wrap_err_with(|| format!("Line {}: invalid {} record", line_no, record))?,
        }
    }
    ensure!(current.is_none(), "Last event is not terminated by an end record");
    Ok(events)
}

/// Add one object record to an event
fn parse_record(event: &mut Event, record: &str, fields: &[&str]) -> Result<()> {
    match record {
        "jet" => {
            let [pt, eta, phi, msoftdrop] = columns::<4>(fields)?;
            event.jets.push(
                field::<Float>(pt)?,
                field::<Float>(eta)?,
                field::<Float>(phi)?,
                field::<Float>(msoftdrop)?,
            );
        }
        "gen" => {
            let [pdg_id, status_flags, eta, phi, mother] = columns::<5>(fields)?;
            let mother = field::<i64>(mother)?;
            event.gen.push(
                field::<i32>(pdg_id)?,
                field::<i32>(status_flags)?,
                field::<Float>(eta)?,
                field::<Float>(phi)?,
                usize::try_from(mother).ok(),
            );
        }
        "pfcand" => {
            let [jet_idx, cand_idx, pt] = columns::<3>(fields)?;
            event.pf_cands.push(
                field::<usize>(jet_idx)?,
                field::<usize>(cand_idx)?,
                field::<Float>(pt)?,
            );
        }
        _ => bail!("Unknown record type"),
    }
    Ok(())
}

/// Check the number of fields of a record
fn columns<'a, const N: usize>(fields: &[&'a str]) -> Result<[&'a str; N]> {
    <[&str; N]>::try_from(fields)
        .map_err(|_| eyre!("Expected {} fields, found {}", N, fields.len()))
}

/// Parse one field of a record
fn field<T: FromStr>(data: &str) -> Result<T>
where
    <T as FromStr>::Err: std::error::Error + Send + Sync + 'static,
{
    data.parse::<T>()
        .wrap_err_with(|| format!("Could not parse {:?}", data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::IS_LAST_COPY;

    const DUMP: &str = "\
# Two events
event
jet 350.5 0.3 -1.2 172.0
jet 210.0 -1.9 1.8 45.5
gen 6 8192 0.35 -1.1 -1
gen 5 8193 0.4 -1.0 0
pfcand 0 17 12.5
pfcand 1 3 0.8
end

event   # no objects at all
end
";

    #[test]
    fn events_are_decoded() {
        let events = parse_events(DUMP).unwrap();
        assert_eq!(events.len(), 2);
        let first = &events[0];
        assert_eq!(first.jets.pt, vec![350.5, 210.]);
        assert_eq!(first.jets.msoftdrop, vec![172., 45.5]);
        assert_eq!(first.gen.pdg_id, vec![6, 5]);
        assert_eq!(first.gen.mother, vec![None, Some(0)]);
        assert!(first.gen.is_last_copy(0));
        assert_eq!(first.gen.status_flags[1], IS_LAST_COPY | 1);
        assert_eq!(first.pf_cands.cand_idx, vec![17, 3]);
        assert_eq!(events[1], Event::default());
    }

    #[test]
    fn malformed_dumps_are_rejected() {
        let err = parse_events("event\njet 1 2 3\nend\n").unwrap_err();
        assert!(format!("{:#}", err).contains("Line 2"), "{:#}", err);
        assert!(parse_events("jet 1 2 3 4\n").is_err());
        assert!(parse_events("event\nevent\n").is_err());
        assert!(parse_events("event\njet 1 2 3 4\n").is_err());
        assert!(parse_events("event\nmuon 1 2 3 4\nend\n").is_err());
        assert!(parse_events("event\npfcand -1 2 3.0\nend\n").is_err());
    }
}
