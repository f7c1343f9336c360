/// Key and index-name construction for the definitions store.
#[derive(Debug, Clone)]
pub struct KeyContext<'a> {
    pub prefix: &'a str,
}

impl<'a> KeyContext<'a> {
    pub fn new(prefix: &'a str) -> Self {
        Self { prefix }
    }

    /// Storage key of one field definition document.
    pub fn definition(&self, definition_id: &str) -> String {
        format!("{}:custom_fields:{}", self.prefix, definition_id)
    }

    /// Key prefix shared by every definition document, as fed to `FT.CREATE`.
    pub fn document_prefix(&self) -> String {
        format!("{}:custom_fields:", self.prefix)
    }

    /// Name of the RediSearch index over definition documents.
    pub fn index_name(&self) -> String {
        format!("{}_custom_fields_idx", self.prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_definition_keys() {
        let ctx = KeyContext::new("mkt");
        assert_eq!(ctx.definition("fd_abc"), "mkt:custom_fields:fd_abc");
        assert_eq!(ctx.document_prefix(), "mkt:custom_fields:");
        assert_eq!(ctx.index_name(), "mkt_custom_fields_idx");
    }
}
