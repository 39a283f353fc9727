//! "Random thing of the day" feeds: a Garfield strip from a random date and a
//! random otter picture.

use chrono::{Days, Local, NaiveDate};
use once_cell::sync::Lazy;
use rand::Rng;
use regex::Regex;
use reqwest::header::USER_AGENT;
use serde::Deserialize;

use crate::data_models::{ComicStrip, RandomImage};
use crate::envelope::Status;
use crate::error::AdapterError;
use crate::fetch::UpstreamClient;

/// Reddit rejects requests without a descriptive user agent.
const REDDIT_USER_AGENT: &str = "Meteor-Backend/1.0";

static OG_IMAGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"<meta property="og:image" content="([^"]+)""#).expect("valid og:image pattern")
});

/// First published strip.
pub fn garfield_epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1978, 6, 19).expect("valid calendar date")
}

/// A uniformly random day in `[garfield_epoch(), today)`.
pub fn random_strip_date<R: Rng + ?Sized>(rng: &mut R, today: NaiveDate) -> NaiveDate {
    let epoch = garfield_epoch();
    let span = (today - epoch).num_days().max(1) as u64;
    epoch
        .checked_add_days(Days::new(rng.random_range(0..span)))
        .unwrap_or(epoch)
}

pub async fn garfield(client: &UpstreamClient) -> Result<ComicStrip, AdapterError> {
    let date = random_strip_date(&mut rand::rng(), Local::now().date_naive());
    let link = format!("{}{}", client.endpoints().garfield, date.format("%Y/%m/%d"));

    let page = client
        .get(&link, &[])
        .map_err(|e| AdapterError::from_fetch("garfield page", e))?
        .browser()
        .text()
        .await
        .map_err(|e| AdapterError::from_fetch("garfield page", e))?;

    let comic = extract_og_image(&page).ok_or_else(|| AdapterError::not_found("garfield comic not found"))?;

    Ok(ComicStrip {
        status: Status::Success,
        date: date.format("%Y-%m-%d").to_string(),
        comic,
        link,
    })
}

pub fn extract_og_image(page: &str) -> Option<String> {
    OG_IMAGE
        .captures(page)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

#[derive(Debug, Deserialize)]
pub(crate) struct Listing {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    #[serde(default)]
    children: Vec<Post>,
}

#[derive(Debug, Deserialize)]
struct Post {
    data: PostData,
}

#[derive(Debug, Deserialize)]
struct PostData {
    #[serde(default)]
    url: String,
}

pub async fn otter(client: &UpstreamClient) -> Result<RandomImage, AdapterError> {
    // The random endpoint answers an array of listings; the post is in the first.
    let listings: Vec<Listing> = client
        .get(&client.endpoints().otters, &[])
        .map_err(|e| AdapterError::from_fetch("otter", e))?
        .header(USER_AGENT, REDDIT_USER_AGENT)
        .json()
        .await
        .map_err(|e| AdapterError::from_fetch("otter", e))?;

    first_post_url(listings)
        .map(|url| RandomImage {
            status: Status::Success,
            url,
        })
        .ok_or_else(|| AdapterError::not_found("no otter found"))
}

pub(crate) fn first_post_url(listings: Vec<Listing>) -> Option<String> {
    listings
        .into_iter()
        .next()?
        .data
        .children
        .into_iter()
        .next()
        .map(|post| post.data.url)
        .filter(|url| !url.is_empty())
}
