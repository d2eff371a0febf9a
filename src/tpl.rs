/// Resolves `$VARIABLE` references in archive file name templates
pub struct Tpl {
    variables: Vec<(String, String)>,
}

impl Tpl {
    pub fn new() -> Self {
        Self {
            variables: Vec::new(),
        }
    }

    /// Register a variable, replacing any previous value under the same key
    pub fn register<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) {
        let key = key.into();
        let value = value.into();
        match self.variables.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.variables.push((key, value)),
        }
        // longest key first so `$NAME` never eats the front of `$NAMESPACE`
        self.variables.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
    }

    /// Substitute every registered variable in `input`
    ///
    /// Single pass over `input`; substituted values are never rescanned.
    pub fn parse(&self, input: &str) -> String {
        let mut result = String::with_capacity(input.len());
        let mut rest = input;

        while let Some(pos) = rest.find('$') {
            result.push_str(&rest[..pos]);
            let after = &rest[pos + 1..];

            match self.variables.iter().find(|(key, _)| after.starts_with(key.as_str())) {
                Some((key, value)) => {
                    result.push_str(value);
                    rest = &after[key.len()..];
                }
                None => {
                    result.push('$');
                    rest = after;
                }
            }
        }

        result.push_str(rest);
        result
    }
}

impl Default for Tpl {
    fn default() -> Self {
        Self::new()
    }
}
