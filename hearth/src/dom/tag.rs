make_str_enum! {
    Tag {
        Div = "div",
        Footer = "footer",
        Header = "header",
        Main = "main",
        Nav = "nav",
        Section = "section",
        Span = "span",
        Style = "style",
    }
}

make_str_enum! {
    Attr {
        Class = "class",
        Id = "id",
        Role = "role",
        DataCacheKey = "data-cache-key",
        DataColorScheme = "data-color-scheme",
        DataLayer = "data-layer",
        DataRoute = "data-route",
        DataHydrated = "data-hydrated",
    }
}
