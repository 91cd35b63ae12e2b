use jiff::SpanRelativeTo;

pub fn parse_duration(input: &str) -> Result<jiff::SignedDuration, String> {
    let duration = parse_signed_duration(input)?;
    if duration.is_negative() {
        return Err(String::from("Duration must not be negative"));
    }

    Ok(duration)
}

fn parse_signed_duration(input: &str) -> Result<jiff::SignedDuration, String> {
    if let Ok(duration) = input.parse::<jiff::SignedDuration>() {
        return Ok(duration);
    }

    if let Ok(duration) = input
        .parse::<jiff::Span>()
        .and_then(|span| span.to_duration(SpanRelativeTo::days_are_24_hours()))
    {
        return Ok(duration);
    }

    if let Ok(seconds) = input.parse::<i64>() {
        return Ok(jiff::SignedDuration::from_secs(seconds));
    }

    Err(String::from("Invalid duration"))
}

/// Raw "lat,lon" pair, range checks are left to the caller.
pub fn parse_lat_lon(input: &str) -> Result<(f64, f64), String> {
    let (lat, lon) = input
        .split_once(',')
        .ok_or_else(|| format!("Expected \"lat,lon\", got \"{input}\""))?;

    let lat = lat
        .trim()
        .parse::<f64>()
        .map_err(|_| format!("Invalid latitude \"{}\"", lat.trim()))?;
    let lon = lon
        .trim()
        .parse::<f64>()
        .map_err(|_| format!("Invalid longitude \"{}\"", lon.trim()))?;

    Ok((lat, lon))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duration() {
        assert_eq!(
            parse_duration("10s").unwrap(),
            jiff::SignedDuration::from_secs(10)
        );
        assert_eq!(
            parse_duration("PT1M").unwrap(),
            jiff::SignedDuration::from_secs(60)
        );
        assert_eq!(
            parse_duration("15").unwrap(),
            jiff::SignedDuration::from_secs(15)
        );
        assert!(parse_duration("soon").is_err());
    }

    #[test]
    fn test_parse_duration_rejects_negative() {
        assert_eq!(
            parse_duration("-5"),
            Err(String::from("Duration must not be negative"))
        );
        assert_eq!(
            parse_duration("-5s"),
            Err(String::from("Duration must not be negative"))
        );
        assert_eq!(
            parse_duration("0").unwrap(),
            jiff::SignedDuration::ZERO
        );
    }

    #[test]
    fn test_parse_lat_lon() {
        assert_eq!(parse_lat_lon("51.504,-0.1129").unwrap(), (51.504, -0.1129));
        assert_eq!(parse_lat_lon(" 91 , 0 ").unwrap(), (91.0, 0.0));
        assert!(parse_lat_lon("51.504").is_err());
        assert!(parse_lat_lon("north,0").is_err());
    }
}
