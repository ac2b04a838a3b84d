//! Aggregate complaint statistics for the admin dashboard.

use serde::{Deserialize, Serialize};

use super::complaint::{Complaint, ComplaintCategory, ComplaintPriority, ComplaintStatus};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub category: ComplaintCategory,
    pub count: u64,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCount {
    pub status: ComplaintStatus,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityCount {
    pub priority: ComplaintPriority,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplaintStats {
    pub total: u64,
    pub by_category: Vec<CategoryCount>,
    pub by_status: Vec<StatusCount>,
    pub by_priority: Vec<PriorityCount>,
    /// Percentage of complaints in `Solved`; 0 when there are none.
    pub resolution_rate: f64,
}

impl ComplaintStats {
    /// Tally a set of complaints. Only labels that occur are listed, in the
    /// fixed label order.
    pub fn from_complaints(complaints: &[Complaint]) -> Self {
        let total = complaints.len() as u64;
        let percent = |count: u64| {
            if total == 0 {
                0.0
            } else {
                count as f64 / total as f64 * 100.0
            }
        };

        let by_category = ComplaintCategory::ALL
            .iter()
            .map(|&category| {
                let count = complaints.iter().filter(|c| c.category == category).count() as u64;
                CategoryCount {
                    category,
                    count,
                    percentage: percent(count),
                }
            })
            .filter(|c| c.count > 0)
            .collect();

        let by_status: Vec<StatusCount> = ComplaintStatus::ALL
            .iter()
            .map(|&status| StatusCount {
                status,
                count: complaints.iter().filter(|c| c.status == status).count() as u64,
            })
            .filter(|s| s.count > 0)
            .collect();

        let by_priority = ComplaintPriority::ALL
            .iter()
            .map(|&priority| PriorityCount {
                priority,
                count: complaints.iter().filter(|c| c.priority == priority).count() as u64,
            })
            .filter(|p| p.count > 0)
            .collect();

        let solved = by_status
            .iter()
            .find(|s| s.status == ComplaintStatus::Solved)
            .map(|s| s.count)
            .unwrap_or(0);

        Self {
            total,
            by_category,
            by_status,
            by_priority,
            resolution_rate: percent(solved),
        }
    }
}
