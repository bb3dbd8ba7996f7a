//! Handler artifact: gin routes for one resource.

use std::fmt::{self, Write};

use super::go::{Imports, write_preamble};
use super::record_vars;
use crate::enrich::EnrichedSchema;

/// Route prefix for a resource (`/blog-posts`).
pub fn route_prefix(schema: &EnrichedSchema<'_>) -> String {
    format!("/{}", schema.naming.plural.kebab)
}

pub fn render(schema: &EnrichedSchema<'_>, module_path: &str) -> Result<String, fmt::Error> {
    let model = &schema.naming.singular.pascal;
    let plural = &schema.naming.plural.pascal;
    let (one, many) = record_vars(schema);
    let prefix = route_prefix(schema);

    let mut imports = Imports::default();
    imports
        .std("errors")
        .std("net/http")
        .std("strconv")
        .external("github.com/gin-gonic/gin")
        .local(format!("{}/internal/models", module_path))
        .local(format!("{}/internal/repository", module_path))
        .local(format!("{}/internal/services", module_path));

    let mut out = String::new();
    write_preamble(&mut out, "handlers")?;
    imports.write(&mut out)?;

    writeln!(out, "// {}Handler serves the {} routes.", model, model)?;
    writeln!(out, "type {}Handler struct {{", model)?;
    writeln!(out, "\tservice *services.{}Service", model)?;
    writeln!(out, "}}")?;
    writeln!(out)?;
    writeln!(out, "func New{0}Handler(service *services.{0}Service) *{0}Handler {{", model)?;
    writeln!(out, "\treturn &{}Handler{{service: service}}", model)?;
    writeln!(out, "}}")?;
    writeln!(out)?;

    writeln!(out, "// Register{}Routes mounts the {} routes under {}.", plural, model, prefix)?;
    writeln!(out, "func Register{}Routes(router gin.IRouter, handler *{}Handler) {{", plural, model)?;
    writeln!(out, "\tgroup := router.Group(\"{}\")", prefix)?;
    writeln!(out, "\tgroup.GET(\"\", handler.List)")?;
    writeln!(out, "\tgroup.GET(\"/:id\", handler.Get)")?;
    writeln!(out, "\tgroup.POST(\"\", handler.Create)")?;
    writeln!(out, "\tgroup.PUT(\"/:id\", handler.Update)")?;
    writeln!(out, "\tgroup.DELETE(\"/:id\", handler.Delete)")?;
    writeln!(out, "}}")?;
    writeln!(out)?;

    let methods = format!(
        "// List handles GET {prefix}?q=&page=&page_size=.
func (h *{model}Handler) List(c *gin.Context) {{
	page, _ := strconv.Atoi(c.DefaultQuery(\"page\", \"1\"))
	pageSize, _ := strconv.Atoi(c.DefaultQuery(\"page_size\", \"20\"))
	{many}, total, err := h.service.List(c.Request.Context(), c.Query(\"q\"), page, pageSize)
	if err != nil {{
		h.fail(c, err)
		return
	}}
	c.JSON(http.StatusOK, gin.H{{\"data\": {many}, \"total\": total, \"page\": page, \"page_size\": pageSize}})
}}

func (h *{model}Handler) Get(c *gin.Context) {{
	id, ok := parseID(c)
	if !ok {{
		return
	}}
	{one}, err := h.service.Get(c.Request.Context(), id)
	if err != nil {{
		h.fail(c, err)
		return
	}}
	c.JSON(http.StatusOK, {one})
}}

func (h *{model}Handler) Create(c *gin.Context) {{
	var input models.{model}
	if err := c.ShouldBindJSON(&input); err != nil {{
		c.JSON(http.StatusBadRequest, gin.H{{\"error\": err.Error()}})
		return
	}}
	{one}, err := h.service.Create(c.Request.Context(), &input)
	if err != nil {{
		h.fail(c, err)
		return
	}}
	c.JSON(http.StatusCreated, {one})
}}

func (h *{model}Handler) Update(c *gin.Context) {{
	id, ok := parseID(c)
	if !ok {{
		return
	}}
	var input models.{model}
	if err := c.ShouldBindJSON(&input); err != nil {{
		c.JSON(http.StatusBadRequest, gin.H{{\"error\": err.Error()}})
		return
	}}
	{one}, err := h.service.Update(c.Request.Context(), id, &input)
	if err != nil {{
		h.fail(c, err)
		return
	}}
	c.JSON(http.StatusOK, {one})
}}

func (h *{model}Handler) Delete(c *gin.Context) {{
	id, ok := parseID(c)
	if !ok {{
		return
	}}
	if err := h.service.Delete(c.Request.Context(), id); err != nil {{
		h.fail(c, err)
		return
	}}
	c.Status(http.StatusNoContent)
}}

func (h *{model}Handler) fail(c *gin.Context, err error) {{
	switch {{
	case errors.Is(err, repository.Err{model}NotFound):
		c.JSON(http.StatusNotFound, gin.H{{\"error\": err.Error()}})
	case errors.Is(err, services.ErrInvalid{model}):
		c.JSON(http.StatusUnprocessableEntity, gin.H{{\"error\": err.Error()}})
	default:
		c.JSON(http.StatusInternalServerError, gin.H{{\"error\": \"internal server error\"}})
	}}
}}
"
    );
    out.push_str(&methods);
    Ok(out)
}

/// Shared id parsing helper for the handlers package. Identical for every
/// schema.
pub fn render_params() -> Result<String, fmt::Error> {
    let mut imports = Imports::default();
    imports
        .std("net/http")
        .external("github.com/gin-gonic/gin")
        .external("github.com/google/uuid");

    let mut out = String::new();
    write_preamble(&mut out, "handlers")?;
    imports.write(&mut out)?;
    out.push_str(
        "// parseID reads the :id path parameter, answering 400 when it is not a UUID.
func parseID(c *gin.Context) (uuid.UUID, bool) {
	id, err := uuid.Parse(c.Param(\"id\"))
	if err != nil {
		c.JSON(http.StatusBadRequest, gin.H{\"error\": \"invalid id\"})
		return uuid.Nil, false
	}
	return id, true
}
",
    );
    Ok(out)
}
