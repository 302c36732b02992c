/// Blend headline sentiment with rolling social sentiment.
///
/// `weight` is the social share, clamped into [0, 1] (NaN counts as 0).
/// Without a usable social value the headline sentiment is returned as is.
///
/// ```
/// use optedge::domain::fusion::fuse;
///
/// assert_eq!(fuse(0.4, Some(-0.2), 0.0), 0.4);
/// assert_eq!(fuse(0.4, Some(-0.2), 1.5), -0.2);
/// assert_eq!(fuse(0.4, None, 0.5), 0.4);
/// ```
#[must_use]
pub fn fuse(headline: f64, social: Option<f64>, weight: f64) -> f64 {
    let Some(social) = social.filter(|s| s.is_finite()) else {
        return headline;
    };
    let w = if weight.is_nan() {
        0.0
    } else {
        weight.clamp(0.0, 1.0)
    };
    if w == 0.0 {
        return headline;
    }
    if w == 1.0 {
        return social;
    }
    (1.0 - w) * headline + w * social
}
