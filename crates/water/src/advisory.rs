use crate::schema::RiskTier;

pub fn health_advisory(tier: RiskTier) -> &'static str {
    match tier {
        RiskTier::Low => "Water appears safe for intended use. Continue monitoring.",
        RiskTier::Medium => "Caution advised. Consider water treatment before consumption.",
        RiskTier::High => "Avoid contact. Water unsafe for consumption or recreational use.",
    }
}

/// Actionable follow-ups for a quality index and contamination score
pub fn recommendations(index: f64, contamination_score: f64) -> Vec<String> {
    let mut recommendations = Vec::new();

    if index < 60.0 {
        recommendations.push("Immediate intervention required - water unsafe for consumption".to_string());
        recommendations.push("Alert local environmental authorities".to_string());
    } else if index < 80.0 {
        recommendations.push("Water treatment recommended before consumption".to_string());
        recommendations.push("Monitor contamination sources".to_string());
    }

    if contamination_score > 0.3 {
        recommendations.push("Identify and eliminate contamination sources".to_string());
        recommendations.push("Implement water filtration systems".to_string());
    }

    if recommendations.is_empty() {
        recommendations.push("Water quality is acceptable".to_string());
        recommendations.push("Continue regular monitoring".to_string());
    }

    recommendations
}
