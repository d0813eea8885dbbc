use std::collections::BTreeMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderableVerdict {
    Pass,
    Fail,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableOffense {
    /// Protection identifier.
    pub violation_type: String,
    /// Section heading the offense is listed under (the protection's humanized name).
    pub group: String,
    pub package: String,
    pub file: String,
    pub message: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableData {
    pub packages_scanned: u32,
    pub offenses_total: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableReport {
    pub verdict: RenderableVerdict,
    pub offenses: Vec<RenderableOffense>,
    pub data: RenderableData,
}

impl RenderableReport {
    /// Offenses grouped by heading, headings in first-seen order, offenses in report order.
    pub fn groups(&self) -> Vec<(&str, Vec<&RenderableOffense>)> {
        let mut order: Vec<&str> = Vec::new();
        let mut by_group: BTreeMap<&str, Vec<&RenderableOffense>> = BTreeMap::new();
        for offense in &self.offenses {
            let group = offense.group.as_str();
            if !by_group.contains_key(group) {
                order.push(group);
            }
            by_group.entry(group).or_default().push(offense);
        }
        order
            .into_iter()
            .map(|group| (group, by_group.remove(group).unwrap_or_default()))
            .collect()
    }
}

#[cfg(test)]
pub(crate) fn offense(group: &str, package: &str, file: &str, message: &str) -> RenderableOffense {
    RenderableOffense {
        violation_type: format!("prevent_{}", group.to_lowercase().replace(' ', "_")),
        group: group.to_string(),
        package: package.to_string(),
        file: file.to_string(),
        message: message.to_string(),
    }
}

#[cfg(test)]
pub(crate) fn report(offenses: Vec<RenderableOffense>) -> RenderableReport {
    let total = offenses.len() as u32;
    RenderableReport {
        verdict: if offenses.is_empty() {
            RenderableVerdict::Pass
        } else {
            RenderableVerdict::Fail
        },
        offenses,
        data: RenderableData {
            packages_scanned: 3,
            offenses_total: total,
        },
    }
}
