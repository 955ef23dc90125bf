//! Date and date-time rules.

use abnf_core::{is_digit, streaming::dquote};
use chrono::{
    DateTime, FixedOffset, LocalResult, NaiveDate as ChronoNaiveDate, NaiveDateTime, NaiveTime,
    TimeZone,
};
use nom::{
    branch::alt,
    bytes::streaming::{tag, tag_no_case, take_while_m_n},
    character::streaming::char,
    combinator::{map, map_res, opt, value},
    sequence::{delimited, preceded, tuple},
};

use crate::{
    decode::{GrammarError, GrammarErrorKind, ImapResult},
    grammar::core::sp,
};

/// `date = date-text / DQUOTE date-text DQUOTE`
pub(crate) fn date(input: &[u8]) -> ImapResult<'_, ChronoNaiveDate> {
    alt((date_text, delimited(dquote, date_text, dquote)))(input)
}

/// `date-text = date-day "-" date-month "-" date-year`
fn date_text(input: &[u8]) -> ImapResult<'_, ChronoNaiveDate> {
    let (remaining, (d, _, m, _, y)) =
        tuple((date_day, tag(b"-"), date_month, tag(b"-"), date_year))(input)?;

    match ChronoNaiveDate::from_ymd_opt(y.into(), m.into(), d.into()) {
        Some(date) => Ok((remaining, date)),
        None => Err(GrammarError::failure(input, GrammarErrorKind::BadDateTime)),
    }
}

/// `date-day = 1*2DIGIT`
fn date_day(input: &[u8]) -> ImapResult<'_, u8> {
    digit_1_2(input)
}

/// `date-month = "Jan" / "Feb" / "Mar" / "Apr" / "May" / "Jun" /
///               "Jul" / "Aug" / "Sep" / "Oct" / "Nov" / "Dec"`
fn date_month(input: &[u8]) -> ImapResult<'_, u8> {
    alt((
        value(1, tag_no_case(b"Jan")),
        value(2, tag_no_case(b"Feb")),
        value(3, tag_no_case(b"Mar")),
        value(4, tag_no_case(b"Apr")),
        value(5, tag_no_case(b"May")),
        value(6, tag_no_case(b"Jun")),
        value(7, tag_no_case(b"Jul")),
        value(8, tag_no_case(b"Aug")),
        value(9, tag_no_case(b"Sep")),
        value(10, tag_no_case(b"Oct")),
        value(11, tag_no_case(b"Nov")),
        value(12, tag_no_case(b"Dec")),
    ))(input)
}

/// `date-year = 4DIGIT`
fn date_year(input: &[u8]) -> ImapResult<'_, u16> {
    map_res(
        map(take_while_m_n(4, 4, is_digit), |bytes| {
            std::str::from_utf8(bytes).unwrap()
        }),
        str::parse::<u16>,
    )(input)
}

/// `time = 2DIGIT ":" 2DIGIT ":" 2DIGIT [ "." 1*6DIGIT ]`
///
/// The fractional-seconds extension (seen in INTERNALDATE from some
/// servers) is parsed and discarded; the RFC does not bound it, the
/// original behaviour of accepting up to six digits is kept.
fn time(input: &[u8]) -> ImapResult<'_, Option<NaiveTime>> {
    let (remaining, ((h, _, m, _, s), _fraction)) = tuple((
        tuple((digit_2, tag(b":"), digit_2, tag(b":"), digit_2)),
        opt(preceded(tag(b"."), take_while_m_n(1, 6, is_digit))),
    ))(input)?;

    Ok((
        remaining,
        NaiveTime::from_hms_opt(h.into(), m.into(), s.into()),
    ))
}

/// `date-time = DQUOTE date-day-fixed "-" date-month "-" date-year SP
///              time SP zone DQUOTE`
pub(crate) fn date_time(input: &[u8]) -> ImapResult<'_, DateTime<FixedOffset>> {
    let mut parser = delimited(
        dquote,
        tuple((
            date_day_fixed,
            tag(b"-"),
            date_month,
            tag(b"-"),
            date_year,
            sp,
            time,
            sp,
            zone,
        )),
        dquote,
    );

    let (remaining, (d, _, m, _, y, _, time, _, zone)) = parser(input)?;

    let date = ChronoNaiveDate::from_ymd_opt(y.into(), m.into(), d.into());

    if let (Some(date), Some(time), Some(zone)) = (date, time, zone) {
        let local = NaiveDateTime::new(date, time);

        if let LocalResult::Single(datetime) = zone.from_local_datetime(&local) {
            return Ok((remaining, datetime));
        }
    }

    Err(GrammarError::failure(input, GrammarErrorKind::BadDateTime))
}

/// `date-day-fixed = (SP DIGIT) / 2DIGIT`
fn date_day_fixed(input: &[u8]) -> ImapResult<'_, u8> {
    alt((
        map(
            preceded(sp, take_while_m_n(1, 1, is_digit)),
            |bytes: &[u8]| bytes[0] - b'0',
        ),
        digit_2,
    ))(input)
}

/// `zone = ("+" / "-") 4DIGIT`
///
/// Hours and minutes east of Greenwich; bounded to ±15:59 with a valid
/// minutes field.
fn zone(input: &[u8]) -> ImapResult<'_, Option<FixedOffset>> {
    let (remaining, (sign, hh, mm)) =
        tuple((alt((char('+'), char('-'))), digit_2, digit_2))(input)?;

    if hh > 15 || mm > 59 {
        return Ok((remaining, None));
    }

    let offset = 3600 * i32::from(hh) + 60 * i32::from(mm);

    let zone = match sign {
        '+' => FixedOffset::east_opt(offset),
        '-' => FixedOffset::west_opt(offset),
        _ => unreachable!(),
    };

    Ok((remaining, zone))
}

fn digit_1_2(input: &[u8]) -> ImapResult<'_, u8> {
    map_res(
        map(take_while_m_n(1, 2, is_digit), |bytes| {
            std::str::from_utf8(bytes).unwrap()
        }),
        str::parse::<u8>,
    )(input)
}

fn digit_2(input: &[u8]) -> ImapResult<'_, u8> {
    map_res(
        map(take_while_m_n(2, 2, is_digit), |bytes| {
            std::str::from_utf8(bytes).unwrap()
        }),
        str::parse::<u8>,
    )(input)
}
