use anyhow::{
  Context,
  bail
};

/// Bar series embedded by the dashboard
/// page as two JSON arrays.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChartSeries {
  pub labels: Vec<String>,
  pub values: Vec<u64>
}

impl ChartSeries {
  pub fn from_embedded(
    labels_json: &str,
    values_json: &str
  ) -> anyhow::Result<Self> {
    let labels: Vec<String> =
      serde_json::from_str(labels_json)
        .context("invalid chart labels")?;
    let values: Vec<u64> =
      serde_json::from_str(values_json)
        .context("invalid chart data")?;
    if labels.len() != values.len() {
      bail!(
        "chart has {} labels but {} values",
        labels.len(),
        values.len()
      );
    }
    Ok(Self { labels, values })
  }

  pub fn max(&self) -> u64 {
    self.values.iter().copied().max().unwrap_or(0)
  }

  pub fn total(&self) -> u64 {
    self.values.iter().sum()
  }

  /// Bar heights as percentages of the
  /// tallest bar.
  pub fn bars(
    &self
  ) -> Vec<(&str, u64, u8)> {
    let max = self.max();
    self
      .labels
      .iter()
      .zip(&self.values)
      .map(|(label, &value)| {
        let pct = if max == 0 {
          0
        } else {
          (value * 100 / max) as u8
        };
        (label.as_str(), value, pct)
      })
      .collect()
  }
}

/// Status breakdown drawn as a doughnut.
/// The page embeds labels, counts and
/// one CSS colour per status.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatusDistribution {
  pub labels: Vec<String>,
  pub values: Vec<u64>,
  pub colors: Vec<String>
}

impl StatusDistribution {
  pub fn from_embedded(
    labels_json: &str,
    values_json: &str,
    colors_json: &str
  ) -> anyhow::Result<Self> {
    let ChartSeries { labels, values } =
      ChartSeries::from_embedded(
        labels_json,
        values_json
      )?;
    let colors: Vec<String> =
      serde_json::from_str(colors_json)
        .context("invalid chart colors")?;
    if colors.len() != labels.len() {
      bail!(
        "chart has {} labels but {} colors",
        labels.len(),
        colors.len()
      );
    }
    Ok(Self {
      labels,
      values,
      colors
    })
  }

  pub fn total(&self) -> u64 {
    self.values.iter().sum()
  }

  /// `(label, value, color, share)` with
  /// the share in whole percent of the
  /// total.
  pub fn slices(
    &self
  ) -> Vec<(&str, u64, &str, u8)> {
    let total = self.total();
    self
      .labels
      .iter()
      .zip(&self.values)
      .zip(&self.colors)
      .map(|((label, &value), color)| {
        let share = if total == 0 {
          0
        } else {
          (value * 100 / total) as u8
        };
        (label.as_str(), value, color.as_str(), share)
      })
      .collect()
  }

  /// CSS `conic-gradient` with one arc per
  /// non-empty status.
  pub fn conic_gradient(&self) -> String {
    let total = self.total();
    if total == 0 {
      return "conic-gradient(#e9ecef 0% 100%)"
        .to_string();
    }
    let mut start = 0.0_f64;
    let arcs: Vec<String> = self
      .values
      .iter()
      .zip(&self.colors)
      .filter(|(value, _)| **value > 0)
      .map(|(&value, color)| {
        let end =
          start + value as f64 * 100.0 / total as f64;
        let arc =
          format!("{color} {start:.1}% {end:.1}%");
        start = end;
        arc
      })
      .collect();
    format!("conic-gradient({})", arcs.join(", "))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn bars_scale_to_the_tallest_value() {
    let series = ChartSeries::from_embedded(
      r#"["Seg","Ter","Qua"]"#,
      "[2, 8, 4]"
    )
    .expect("valid series");
    assert_eq!(series.total(), 14);
    assert_eq!(
      series.bars(),
      vec![
        ("Seg", 2, 25),
        ("Ter", 8, 100),
        ("Qua", 4, 50)
      ]
    );
  }

  #[test]
  fn mismatched_lengths_are_rejected() {
    let err = ChartSeries::from_embedded(
      r#"["Seg"]"#,
      "[1, 2]"
    )
    .expect_err("length mismatch");
    assert!(
      err.to_string().contains("1 labels but 2")
    );
  }

  #[test]
  fn status_slices_share_the_total() {
    let chart = StatusDistribution::from_embedded(
      r#"["Pendente","Entregue","Cancelado"]"#,
      "[1, 3, 0]",
      r##"["#ffc107","#198754","#212529"]"##
    )
    .expect("valid distribution");
    assert_eq!(chart.total(), 4);
    assert_eq!(
      chart.slices(),
      vec![
        ("Pendente", 1, "#ffc107", 25),
        ("Entregue", 3, "#198754", 75),
        ("Cancelado", 0, "#212529", 0)
      ]
    );
    assert_eq!(
      chart.conic_gradient(),
      "conic-gradient(#ffc107 0.0% 25.0%, #198754 25.0% 100.0%)"
    );
  }

  #[test]
  fn status_colors_must_match_the_labels() {
    let err = StatusDistribution::from_embedded(
      r#"["Pendente","Entregue"]"#,
      "[1, 3]",
      r##"["#ffc107"]"##
    )
    .expect_err("missing color");
    assert!(
      err.to_string().contains("2 labels but 1 colors")
    );

    let err = StatusDistribution::from_embedded(
      r#"["Pendente"]"#,
      "[1, 3]",
      r##"["#ffc107"]"##
    )
    .expect_err("missing label");
    assert!(
      err.to_string().contains("1 labels but 2")
    );
  }

  #[test]
  fn empty_distribution_draws_a_grey_ring() {
    let chart = StatusDistribution::default();
    assert!(chart.slices().is_empty());
    assert_eq!(
      chart.conic_gradient(),
      "conic-gradient(#e9ecef 0% 100%)"
    );
  }

  #[test]
  fn empty_series_has_flat_bars() {
    let series = ChartSeries::default();
    assert_eq!(series.max(), 0);
    assert!(series.bars().is_empty());
  }
}
